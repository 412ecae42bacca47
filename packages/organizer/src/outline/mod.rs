//! Outline reconstruction: heading classification, the builder state
//! machine and article partitioning.

pub mod builder;
pub mod classify;
pub mod partition;
pub mod scheme;
pub mod types;

pub use builder::{build_outline, OutlineBuilder};
pub use classify::HeadingClassifier;
pub use partition::{description_snippet, ArticlePartitioner};
pub use scheme::{
    create_html_hierarchy, create_plan_hierarchy, create_pot_hierarchy, ArticleHeadingMode,
    DocumentFamily, HierarchyScheme, TitleLinePolicy,
};
pub use types::{BuilderState, ContentRun};
