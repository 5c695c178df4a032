pub mod cart_store;
pub mod selection;

pub use cart_store::CartStore;
pub use selection::Selection;
