//! Template expansion for type-specialized C kernels.
//!
//! A template is ordinary C with markers bound to type parameters:
//!
//! | Marker | Replaced by |
//! |--------|-------------|
//! | `%%TYPE%%` | storage type (`int32_t`) |
//! | `%%TYPE_ABBREV%%` | short id (`i32`) |
//! | `%%TYPE_MAX%%`, `%%TYPE_MIN%%` | limit constants |
//! | `%%TYPE_LONG%%`, `%%TYPE_LONG_ABBREV%%` | the widened type |
//! | `%%TYPE <expr>%%` | `expr` lowered for the type |
//! | `%%TYPE_LONG <expr>%%` | `expr` lowered for the widened type |
//! | `%%= <stmt>%%` | a generation-time value |
//!
//! The engine instantiates one template for one set of bindings, stripping
//! comments and harvesting prototypes as it goes. [`Expander`] drives the
//! engine over every combination of a request's type groups.

mod comments;
mod declarations;
mod engine;
mod error;
mod expand;
mod markers;
mod meta;

pub use comments::CommentScanner;
pub use declarations::{reduce_to_prototype, DeclarationHarvester, Omitted};
pub use engine::{Binding, Instantiation, Template, TemplateEngine};
pub use error::TemplateError;
pub use expand::{
    ExpansionOutput, ExpansionRequest, Expander, FsLoader, MemoryLoader, ParamGroup,
    TemplateLoader, TEMPLATE_EXT,
};
pub use meta::{MetaContext, MetaError, Value};
