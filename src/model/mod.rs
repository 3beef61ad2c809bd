pub mod attachment;
pub mod config;
pub mod item;
pub mod store;

pub use attachment::*;
pub use config::*;
pub use item::*;
pub use store::*;

use rand::Rng;
use rand::distr::Alphanumeric;

/// Random alphanumeric suffix appended to generated ids so that two ids
/// minted within the same millisecond cannot collide.
pub(crate) fn random_suffix() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(9)
        .map(char::from)
        .collect()
}
