// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BUILD-REF - Anotação de Citações
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Insere marcadores [1], [1,2] na resposta e acrescenta a lista de referências:
// - Numeração estável das fontes únicas (SourceMap, chave = URI bruta)
// - Inserção por índice de caractere, do maior offset para o menor
// - URLs resolvidas (opcional) e percent-decoded para exibição
//
// A ordem decrescente é obrigatória: inserir no offset k desloca todos os
// offsets > k, então processando do fim para o início nenhum offset ainda
// pendente é invalidado.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::types::{Segment, SourceChunk, SourceMap, UrlMapping};
use crate::utils::text::{decode_for_display, insert_at_char};

/// Cabeçalho da seção de referências
pub const REFERENCES_HEADER: &str = "---\n**References:**";

/// Builder de citações
///
/// Sem `UrlMapping` exibe as URIs brutas (ainda decodificadas).
#[derive(Debug, Clone, Copy, Default)]
pub struct CitationBuilder<'a> {
    url_mapping: Option<&'a UrlMapping>,
}

impl<'a> CitationBuilder<'a> {
    /// Cria um builder sem URLs resolvidas
    pub fn new() -> Self {
        Self::default()
    }

    /// Usa as URLs resolvidas na seção de referências
    pub fn with_url_mapping(mut self, url_mapping: &'a UrlMapping) -> Self {
        self.url_mapping = Some(url_mapping);
        self
    }

    /// Anota a resposta com marcadores e acrescenta as referências.
    ///
    /// Sem chunks ou sem segmentos o texto volta intacto. Com ambos presentes
    /// a seção de referências é sempre emitida, mesmo sem fontes citáveis.
    pub fn annotate(&self, text: &str, chunks: &[SourceChunk], segments: &[Segment]) -> String {
        if chunks.is_empty() || segments.is_empty() {
            log::debug!(
                "[annotate] Sem dados de grounding (chunks={}, segments={}), texto intacto",
                chunks.len(),
                segments.len()
            );
            return text.to_string();
        }

        let sources = SourceMap::from_chunks(chunks);
        if sources.is_empty() {
            log::warn!("[annotate] Nenhum dos {} chunks tem URI citável", chunks.len());
        }

        let body = insert_markers(text, &sources, segments);
        let references = self.render_references(&sources);

        log::info!(
            "📚 {} fontes únicas citadas em {} segmentos",
            sources.len(),
            segments.len()
        );

        format!("{}\n\n{}", body, references)
    }

    /// Monta a seção de referências, uma linha por fonte em ordem de número
    pub fn render_references(&self, sources: &SourceMap) -> String {
        let mut lines = Vec::with_capacity(sources.len() + 1);
        lines.push(REFERENCES_HEADER.to_string());

        for entry in sources.entries() {
            lines.push(format!(
                "[{}] {}: {}",
                entry.number,
                entry.title,
                self.display_url(&entry.uri)
            ));
        }

        lines.join("\n")
    }

    /// URL resolvida (se houver) ou a URI bruta, decodificada
    fn display_url(&self, uri: &str) -> String {
        let target = self
            .url_mapping
            .and_then(|mapping| mapping.get(uri))
            .map(String::as_str)
            .unwrap_or(uri);

        decode_for_display(target).into_owned()
    }
}

/// Formata o marcador inline: `" [1,3]"`
pub fn format_marker(numbers: &[usize]) -> String {
    let joined = numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!(" [{}]", joined)
}

/// Insere os marcadores de cada segmento no seu offset final.
///
/// Segmentos com o mesmo offset são processados na ordem de entrada
/// (sort estável), então o último deles fica mais à esquerda.
pub fn insert_markers(text: &str, sources: &SourceMap, segments: &[Segment]) -> String {
    let mut ordered: Vec<&Segment> = segments.iter().collect();
    ordered.sort_by(|a, b| b.end_index.cmp(&a.end_index));

    let mut buffer: Vec<char> = text.chars().collect();
    let mut inserted = 0;

    for segment in ordered {
        let numbers = sources.footnotes_for(&segment.chunk_indices);
        if numbers.is_empty() {
            log::debug!(
                "[insert_markers] Segmento em {} sem fonte citável, ignorado",
                segment.end_index
            );
            continue;
        }

        insert_at_char(&mut buffer, segment.end_index, &format_marker(&numbers));
        inserted += 1;
    }

    log::debug!("[insert_markers] {} marcadores inseridos", inserted);
    buffer.into_iter().collect()
}

/// Atalho: anota `text` com ou sem URLs resolvidas
pub fn add_citations(
    text: &str,
    chunks: &[SourceChunk],
    segments: &[Segment],
    url_mapping: Option<&UrlMapping>,
) -> String {
    let builder = match url_mapping {
        Some(mapping) => CitationBuilder::new().with_url_mapping(mapping),
        None => CitationBuilder::new(),
    };
    builder.annotate(text, chunks, segments)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: &str = "Paris is the capital of France.";

    #[test]
    fn test_single_citation_exact_output() {
        let chunks = vec![SourceChunk::new("http://a", "Geo")];
        let segments = vec![Segment::new(31, vec![0])];

        let result = add_citations(PARIS, &chunks, &segments, None);
        assert_eq!(
            result,
            "Paris is the capital of France. [1]\n\n---\n**References:**\n[1] Geo: http://a"
        );
    }

    #[test]
    fn test_same_chunk_two_segments() {
        let chunks = vec![SourceChunk::new("http://a", "Geo")];
        let segments = vec![Segment::new(5, vec![0]), Segment::new(31, vec![0])];

        let result = add_citations(PARIS, &chunks, &segments, None);
        assert_eq!(
            result,
            "Paris [1] is the capital of France. [1]\n\n---\n**References:**\n[1] Geo: http://a"
        );
        assert_eq!(result.matches("[1] Geo").count(), 1);
    }

    #[test]
    fn test_unknown_source_title() {
        let chunks = vec![SourceChunk::untitled("http://a")];
        let segments = vec![Segment::new(31, vec![0])];

        let result = add_citations(PARIS, &chunks, &segments, None);
        assert!(result.ends_with("[1] Unknown source: http://a"));
    }

    #[test]
    fn test_no_grounding_data_returns_text() {
        let chunks = vec![SourceChunk::new("http://a", "Geo")];
        let segments = vec![Segment::new(31, vec![0])];

        assert_eq!(add_citations(PARIS, &[], &segments, None), PARIS);
        assert_eq!(add_citations(PARIS, &chunks, &[], None), PARIS);
    }

    #[test]
    fn test_segment_without_citable_chunks_gets_no_marker() {
        let chunks = vec![SourceChunk::default(), SourceChunk::new("http://a", "Geo")];
        let segments = vec![Segment::new(5, vec![0]), Segment::new(31, vec![1, 7])];

        let result = add_citations(PARIS, &chunks, &segments, None);
        assert!(result.starts_with("Paris is the capital of France. [1]\n\n"));
    }

    #[test]
    fn test_multiple_sources_sorted_in_marker() {
        let chunks = vec![
            SourceChunk::new("http://a", "A"),
            SourceChunk::new("http://b", "B"),
        ];
        let segments = vec![Segment::new(31, vec![1, 0, 1])];

        let result = add_citations(PARIS, &chunks, &segments, None);
        assert!(result.starts_with("Paris is the capital of France. [1,2]\n\n"));
        assert!(result.ends_with("[1] A: http://a\n[2] B: http://b"));
    }

    #[test]
    fn test_markers_land_on_original_offsets() {
        let text = "abcdefghij";
        let chunks = vec![
            SourceChunk::new("http://a", "A"),
            SourceChunk::new("http://b", "B"),
        ];
        // Ordem de entrada embaralhada de propósito
        let segments = vec![
            Segment::new(5, vec![1]),
            Segment::new(10, vec![0]),
            Segment::new(2, vec![0]),
        ];
        let sources = SourceMap::from_chunks(&chunks);

        let body = insert_markers(text, &sources, &segments);
        assert_eq!(body, "ab [1]cde [2]fghij [1]");

        // Cada marcador fica no offset original + tamanho dos marcadores anteriores
        let mut shift = 0;
        for (offset, marker) in [(2, " [1]"), (5, " [2]"), (10, " [1]")] {
            let at = offset + shift;
            assert_eq!(&body[at..at + marker.len()], marker);
            shift += marker.len();
        }
    }

    #[test]
    fn test_char_offsets_not_bytes() {
        let text = "São Paulo é grande.";
        let chunks = vec![SourceChunk::new("http://sp", "SP")];
        let segments = vec![Segment::new(9, vec![0])];
        let sources = SourceMap::from_chunks(&chunks);

        assert_eq!(
            insert_markers(text, &sources, &segments),
            "São Paulo [1] é grande."
        );
    }

    #[test]
    fn test_equal_offsets_are_deterministic() {
        let chunks = vec![
            SourceChunk::new("http://a", "A"),
            SourceChunk::new("http://b", "B"),
        ];
        let segments = vec![Segment::new(3, vec![0]), Segment::new(3, vec![1])];
        let sources = SourceMap::from_chunks(&chunks);

        let first = insert_markers("abc", &sources, &segments);
        assert_eq!(first, "abc [2] [1]");
        assert_eq!(insert_markers("abc", &sources, &segments), first);
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let chunks = vec![SourceChunk::new("http://a", "A")];
        let segments = vec![Segment::new(500, vec![0])];
        let sources = SourceMap::from_chunks(&chunks);

        assert_eq!(insert_markers("abc", &sources, &segments), "abc [1]");
    }

    #[test]
    fn test_resolved_and_decoded_urls() {
        let chunks = vec![
            SourceChunk::new("https://redirect/1", "Wiki"),
            SourceChunk::new("https://redirect/2", "Other"),
        ];
        let segments = vec![Segment::new(31, vec![0, 1])];
        let mut mapping = UrlMapping::new();
        mapping.insert(
            "https://redirect/1".into(),
            "https://pt.wikipedia.org/wiki/S%C3%A3o_Paulo".into(),
        );

        let result = add_citations(PARIS, &chunks, &segments, Some(&mapping));
        assert!(result.contains("[1] Wiki: https://pt.wikipedia.org/wiki/São_Paulo"));
        // Sem entrada no mapa: URI bruta
        assert!(result.contains("[2] Other: https://redirect/2"));
    }

    #[test]
    fn test_distinct_raw_uris_stay_distinct() {
        let chunks = vec![
            SourceChunk::new("https://redirect?id=1", "Same"),
            SourceChunk::new("https://redirect?id=2", "Same"),
        ];
        let segments = vec![Segment::new(31, vec![0, 1])];
        let mut mapping = UrlMapping::new();
        mapping.insert("https://redirect?id=1".into(), "https://final".into());
        mapping.insert("https://redirect?id=2".into(), "https://final".into());

        let result = add_citations(PARIS, &chunks, &segments, Some(&mapping));
        assert!(result.contains("[1] Same: https://final\n[2] Same: https://final"));
    }

    #[test]
    fn test_no_citable_sources_keeps_header() {
        let chunks = vec![SourceChunk::default()];
        let segments = vec![Segment::new(3, vec![0])];

        assert_eq!(
            add_citations("abc", &chunks, &segments, None),
            "abc\n\n---\n**References:**"
        );
    }

    #[test]
    fn test_format_marker() {
        assert_eq!(format_marker(&[1]), " [1]");
        assert_eq!(format_marker(&[1, 2, 5]), " [1,2,5]");
    }
}
