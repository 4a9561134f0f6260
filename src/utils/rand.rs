use rand::rngs::StdRng;
use rand::SeedableRng;

/// Subsystems that draw random numbers. Each gets its own generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RngStream {
    Environment,
    Engine,
    Exploration,
}

impl RngStream {
    fn salt(&self) -> u64 {
        match self {
            RngStream::Environment => 0x656e_7669_726f_6e6d,
            RngStream::Engine => 0x656e_6769_6e65_0000,
            RngStream::Exploration => 0x6578_706c_6f72_6500,
        }
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    return x ^ (x >> 31);
}

/// The single random seed of an agent, handed to every subsystem at
/// construction instead of being set process-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedContext {
    seed: Option<u64>,
}

impl SeedContext {
    pub fn new(seed: Option<u64>) -> Self {
        return Self { seed };
    }

    pub fn seed(&self) -> Option<u64> {
        return self.seed;
    }

    /// Seed for `stream`, `None` when the context is unseeded.
    pub fn stream_seed(&self, stream: RngStream) -> Option<u64> {
        return self.seed.map(|seed| splitmix64(seed ^ stream.salt()));
    }

    /// A fresh generator for `stream`. Deterministic when seeded, OS entropy otherwise.
    pub fn rng(&self, stream: RngStream) -> StdRng {
        match self.stream_seed(stream) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
