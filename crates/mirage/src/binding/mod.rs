//! Response binding store: the responses attached to tree leaves.

mod method;
mod params;
mod table;

pub use method::HttpMethod;
pub use params::{format_params, parse_text, ParamBindings, ParamBindingsInput};
pub use table::{BindingId, BindingTable, GenericListing, ResponseBinding};
