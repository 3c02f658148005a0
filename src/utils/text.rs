// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TEXT UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Utilitários para processamento de texto:
// - Inserção por índice de caractere (não de byte)
// - Decodificação de URLs para exibição
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::borrow::Cow;

/// Insere `insertion` no buffer de caracteres na posição `char_index`.
///
/// Posições além do fim são limitadas ao fim do buffer. Retorna a posição
/// efetivamente usada.
pub fn insert_at_char(buffer: &mut Vec<char>, char_index: usize, insertion: &str) -> usize {
    let at = char_index.min(buffer.len());
    if at != char_index {
        log::debug!(
            "[insert_at_char] Offset {} além do fim ({}), inserindo no fim",
            char_index,
            buffer.len()
        );
    }
    buffer.splice(at..at, insertion.chars());
    at
}

/// Decodifica percent-encoding de uma URL para leitura humana.
///
/// Se a sequência decodificada não for UTF-8 válido, mantém a string original
/// e loga um warning.
pub fn decode_for_display(url: &str) -> Cow<'_, str> {
    match urlencoding::decode(url) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!("⚠️ Não foi possível decodificar URL '{}': {}", url, e);
            Cow::Borrowed(url)
        }
    }
}
