//! Scene objects.
//!
//! Responsibilities:
//! - the [`Drawable`] / [`DrawableInit`] contract every scene object satisfies
//! - creation-order identity ([`ObjectLabel`], [`ObjectCounter`])
//! - the insertion-ordered [`SceneGraph`] the renderer iterates each frame

mod drawable;
mod graph;
mod label;

pub use drawable::{initialize, load_shader_module, Drawable, DrawableInit, InitCtx};
pub use graph::SceneGraph;
pub use label::{ObjectCounter, ObjectLabel};
