pub mod ast;
pub mod config;
pub mod error;
pub mod export;
pub mod lexer;
pub mod manifest;
pub mod parser;
pub mod project;

pub use ast::{Document, FieldDeclaration, FieldShape, Modifier, SchemaMap, SchemaSection, Value};
pub use error::{MangoError, Warning};
pub use project::{Component, ComponentData, Project};
