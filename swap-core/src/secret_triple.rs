use flowswap_primitives::{gen_secret, verify, Hashlock, Secret};
use serde::{Deserialize, Serialize};

/// The three independent secrets generated by whichever party funds the
/// first HTLC. `SHA256(S_x) = H_x` for x in {user, lp1, lp2}; a claim on
/// any one leg publishes all three at once.
pub struct SecretTriple {
    pub user: Secret,
    pub lp1: Secret,
    pub lp2: Secret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashlockTriple {
    pub user: Hashlock,
    pub lp1: Hashlock,
    pub lp2: Hashlock,
}

impl SecretTriple {
    pub fn generate() -> (Self, HashlockTriple) {
        let (s_user, h_user) = gen_secret();
        let (s_lp1, h_lp1) = gen_secret();
        let (s_lp2, h_lp2) = gen_secret();
        (
            Self {
                user: s_user,
                lp1: s_lp1,
                lp2: s_lp2,
            },
            HashlockTriple {
                user: h_user,
                lp1: h_lp1,
                lp2: h_lp2,
            },
        )
    }

    pub fn matches(&self, hashlocks: &HashlockTriple) -> bool {
        verify(&self.user, &hashlocks.user)
            && verify(&self.lp1, &hashlocks.lp1)
            && verify(&self.lp2, &hashlocks.lp2)
    }
}
