pub use crate::{
    fill::filler::{FillOutcome, Filler, fill_form},
    form::capture::capture_form,
    page::document::FormDocument,
    template::{index::build_index, template_model::TemplateEntry},
    text::similarity::similarity,
};

pub mod cli;
pub mod error;
pub mod fill;
pub mod form;
pub mod page;
pub mod template;
pub mod text;
pub mod trace;
