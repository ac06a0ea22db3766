//! Effect engine: the functions printed on buildings.
//!
//! - `Step`: one elementary action (spend, gain, clear land, use a building)
//! - `Function`: ordered steps combined by a `Joiner`
//! - `StepContext`: the game and acting seat a function runs against
//! - `Validation`: accumulator threaded through one execution
//! - `Criteria`: which buildings a use-building step may reach
//!
//! ## Text in, state out
//!
//! Every step reads its clause from the front of the player's argument text
//! (`spend 2 grain to gain 1 flour`) and passes what follows to its child.
//! Steps never guess: text that does not parse is a failure of that step,
//! and a function succeeds only when every word has been consumed.

mod function;
pub mod grammar;
mod resolver;
mod step;
mod targeting;
mod validation;

pub use function::{Function, Joiner};
pub use resolver::StepContext;
pub use step::{GoodsLookup, PerLookup, Step};
pub use targeting::{BuildingRef, Criteria};
pub use validation::{StepParams, Validation};
