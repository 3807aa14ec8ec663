// Export foundational arithmetic operations directly
pub mod add;

pub use add::{add_backward, add_op};
