//! Built-in category dictionaries.
//!
//! The keyword and semantic strategies ship with independent defaults: the
//! keyword dictionary lists normalized substrings to look for, while the
//! semantic dictionary anchors each category on its descriptive name only and
//! lets the refinement loop grow the exemplars.

use super::store::CategoryStore;

/// Default categories and keywords for substring matching.
pub const KEYWORD_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Buena experiencia con ejecutivos",
        &["buena atencion", "buen trato", "ejecutivo", "personal", "profesional"],
    ),
    (
        "Mala experiencia con la competencia",
        &["mala atencion", "competencia", "isl", "otra mutual", "anterior"],
    ),
    (
        "Recomendación de terceros",
        &["recomendacion", "recomendado", "referencia", "prevencionista"],
    ),
    (
        "Obligación contractual",
        &["obligacion", "exige", "requisito", "licitacion", "contrato", "legal"],
    ),
    (
        "Cercanía geográfica o conveniencia",
        &["cercania", "localidad", "sucursal", "faena", "presencia"],
    ),
    (
        "Confianza en la mutual",
        &["confianza", "confiable", "trayectoria", "experiencia", "historia", "todo ok"],
    ),
    (
        "Costos o beneficios económicos",
        &["costo", "beneficio", "arancel", "precio", "economico"],
    ),
    (
        "Prestaciones o herramientas destacadas",
        &[
            "plataforma",
            "herramienta",
            "curso",
            "capacitacion",
            "web",
            "documentos",
            "servicio",
        ],
    ),
];

/// Default dictionary for the keyword strategy.
pub fn default_keyword_store() -> CategoryStore {
    CategoryStore::from_pairs(
        KEYWORD_CATEGORIES
            .iter()
            .map(|(name, keywords)| (*name, keywords.iter().copied())),
    )
}

/// Default dictionary for the semantic strategy: category names without exemplars.
pub fn default_semantic_store() -> CategoryStore {
    CategoryStore::from_pairs(
        KEYWORD_CATEGORIES
            .iter()
            .map(|(name, _)| (*name, std::iter::empty::<&str>())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_store_has_every_category_in_order() {
        let store = default_keyword_store();
        let names: Vec<&str> = store.categories().collect();
        let expected: Vec<&str> = KEYWORD_CATEGORIES.iter().map(|(name, _)| *name).collect();

        assert_eq!(names, expected);
        assert_eq!(
            store.exemplars("Costos o beneficios económicos").unwrap(),
            ["costo", "beneficio", "arancel", "precio", "economico"]
        );
    }

    #[test]
    fn test_semantic_store_has_names_only() {
        let store = default_semantic_store();
        assert_eq!(store.len(), KEYWORD_CATEGORIES.len());
        assert_eq!(store.exemplar_count(), 0);
    }
}
