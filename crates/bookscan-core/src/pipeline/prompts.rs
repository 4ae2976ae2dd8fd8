//! Prompt text and placeholder values, per language.

use crate::config::Language;
use crate::types::{BookMetadata, ExtractedIdentity};

/// Fixed instruction sent with the cover image.
pub fn extraction_prompt(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Analyze this book cover and identify the title and the author. \
             Respond ONLY with JSON in this exact format: \
             {\"title\": \"book title\", \"author\": \"author name\"}"
        }
        Language::Fr => {
            "Analyse cette couverture de livre et identifie le titre et l'auteur. \
             Réponds UNIQUEMENT au format JSON: \
             {\"title\": \"titre du livre\", \"author\": \"nom de l'auteur\"}"
        }
    }
}

/// Identity used when the vision response cannot be read.
pub fn placeholder_identity(language: Language) -> ExtractedIdentity {
    match language {
        Language::En => ExtractedIdentity::new("title not identified", "unknown author"),
        Language::Fr => {
            ExtractedIdentity::new("Le titre n'a pas pu être identifié", "Auteur inconnu")
        }
    }
}

/// Build the summary prompt. Depends only on the metadata and language.
///
/// With a description, the prompt embeds it verbatim and asks for a faithful
/// summary. Without one, it says so and asks the model to rely on its own
/// knowledge; no description text appears in that variant.
pub fn summary_prompt(metadata: &BookMetadata, language: Language) -> String {
    let BookMetadata {
        title,
        author,
        description,
        ..
    } = metadata;

    match (language, description.as_deref()) {
        (Language::En, Some(description)) => format!(
            "Write a concise summary of the book \"{title}\" by {author} in about 10 lines. \
             Here is the official description: {description}. \
             Make the summary clear, structured and faithful to this description."
        ),
        (Language::En, None) => format!(
            "Write a concise summary of the book \"{title}\" by {author} in about 10 lines. \
             No official description is available, so rely on your own knowledge of the book. \
             Make the summary clear, structured and faithful to the book."
        ),
        (Language::Fr, Some(description)) => format!(
            "Écris un résumé concis du livre \"{title}\" de {author} en environ 10 lignes. \
             Voici la description officielle: {description}. \
             Rends le résumé clair, structuré et fidèle à cette description."
        ),
        (Language::Fr, None) => format!(
            "Écris un résumé concis du livre \"{title}\" de {author} en environ 10 lignes. \
             Aucune description officielle n'est disponible: base-toi sur tes connaissances du livre. \
             Rends le résumé clair, structuré et fidèle au livre."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(description: Option<&str>) -> BookMetadata {
        BookMetadata {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            cover_url: None,
            description: description.map(String::from),
        }
    }

    #[test]
    fn test_prompt_embeds_description_verbatim() {
        let description = "Set on the desert planet Arrakis, <b>Dune</b> is the story of Paul.";
        for language in [Language::En, Language::Fr] {
            let prompt = summary_prompt(&metadata(Some(description)), language);
            assert!(prompt.contains(description));
            assert!(prompt.contains("\"Dune\""));
            assert!(prompt.contains("Frank Herbert"));
        }
    }

    #[test]
    fn test_prompt_without_description() {
        let prompt = summary_prompt(&metadata(None), Language::En);
        assert!(prompt.contains("No official description is available"));
        assert!(!prompt.contains("Here is the official description"));

        let prompt = summary_prompt(&metadata(None), Language::Fr);
        assert!(prompt.contains("Aucune description officielle"));
        assert!(!prompt.contains("Voici la description officielle"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let m = metadata(Some("A desert planet."));
        assert_eq!(
            summary_prompt(&m, Language::En),
            summary_prompt(&m.clone(), Language::En)
        );
    }

    #[test]
    fn test_cover_url_does_not_affect_prompt() {
        let mut with_cover = metadata(None);
        with_cover.cover_url = Some("http://books.google.com/cover.jpg".to_string());
        assert_eq!(
            summary_prompt(&with_cover, Language::En),
            summary_prompt(&metadata(None), Language::En)
        );
    }

    #[test]
    fn test_extraction_prompt_demands_json() {
        for language in [Language::En, Language::Fr] {
            let prompt = extraction_prompt(language);
            assert!(prompt.contains("\"title\""));
            assert!(prompt.contains("\"author\""));
        }
    }

    #[test]
    fn test_placeholders_non_empty() {
        for language in [Language::En, Language::Fr] {
            let placeholder = placeholder_identity(language);
            assert!(!placeholder.title.is_empty());
            assert!(!placeholder.author.is_empty());
        }
        assert_eq!(placeholder_identity(Language::En).author, "unknown author");
    }
}
