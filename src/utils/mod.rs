// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// UTILITÁRIOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Utilitários compartilhados:
// - Anotação de citações (marcadores + referências)
// - Text processing por índice de caractere
// - Timing das etapas com I/O
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Anotação de citações: marcadores inline e seção de referências.
pub mod build_ref;
mod text;
mod timing;

pub use build_ref::{add_citations, format_marker, insert_markers, CitationBuilder, REFERENCES_HEADER};
pub use text::*;
pub use timing::ActionTimer;
