//! Product list domain module.
//!
//! An ordered, in-memory list of named products with add, rename and remove
//! operations. Pure domain logic: no IO, no UI, no storage. Every operation is
//! total; degenerate input (blank names, unknown ids, empty index sets) is a
//! silent no-op.

pub mod list;
pub mod product;

pub use list::{
    AddProduct, ProductAdded, ProductList, ProductListCommand, ProductListEvent, ProductListId,
    ProductRemoved, ProductRenamed, ProductsRemoved, RemoveProduct, RemoveProductsAt,
    RenameProduct,
};
pub use product::{Product, ProductId};
