use std::env;

/// bcrypt work factor used when hashing account passwords.
#[derive(Clone, Debug)]
pub struct PasswordConfig {
    pub cost: u32,
}

impl PasswordConfig {
    pub const DEFAULT_COST: u32 = 12;

    pub fn from_env() -> Self {
        let cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(Self::DEFAULT_COST)
            .clamp(4, 31);

        Self { cost }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            cost: Self::DEFAULT_COST,
        }
    }
}
