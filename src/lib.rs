//! An ordered map implemented with an AVL tree.
//!
//! Nodes keep a link to their parent, so rebalancing walks up from the point
//! of change without recursion and traversals need no stack.
//!
//! ```
//! use avl_map::{AvlTreeMap, Order};
//! let mut map = AvlTreeMap::new();
//! for key in [3, 5, 6, 1, 2, 9] {
//!     map.insert(key, key * 10).unwrap();
//! }
//! assert_eq!(map.get(&6), Some(&60));
//! assert_eq!(
//!     map.traverse(Order::Preorder).copied().collect::<Vec<_>>(),
//!     [5, 2, 1, 3, 6, 9]
//! );
//! ```

mod error;
pub mod map;
mod node;

pub use error::{Error, Result};
pub use map::{AvlTreeMap, Order};
