use crate::domain::model::{DataDomain, FieldHint};
use std::fmt::Write;

pub const DATAGEN_SYSTEM_PROMPT: &str =
    "You are a synthetic data generator. Generate realistic and coherent data in JSON format.";

/// Loose type descriptions for the built-in domain schemas. Field order
/// must stay in lockstep with `DataDomain::default_schema`; a test below
/// enforces that.
fn default_field_hints(domain: DataDomain) -> &'static [(&'static str, &'static str)] {
    match domain {
        DataDomain::Business => &[
            ("company_id", "string"),
            ("name", "string"),
            ("industry", "string"),
            ("revenue", "float"),
            ("employees", "integer"),
            ("location", "string"),
            ("founded_year", "integer"),
        ],
        DataDomain::Health => &[
            ("patient_id", "string"),
            ("age", "integer"),
            ("gender", "string"),
            ("diagnosis", "string"),
            ("treatment", "string"),
            ("admission_date", "string, YYYY-MM-DD"),
            ("discharge_date", "string, YYYY-MM-DD"),
        ],
        DataDomain::Ecommerce => &[
            ("order_id", "string"),
            ("customer_id", "string"),
            ("product", "string"),
            ("quantity", "integer"),
            ("price", "float"),
            ("order_date", "string, YYYY-MM-DD"),
            ("shipping_address", "string"),
        ],
        DataDomain::Nlp => &[
            ("text_id", "string"),
            ("text", "string"),
            ("label", "string"),
            ("language", "string"),
            ("source", "string"),
        ],
    }
}

fn render_schema_block(domain: DataDomain, schema_hint: Option<&[FieldHint]>) -> String {
    let mut block = String::from("{\n");
    match schema_hint {
        Some(hints) => {
            for hint in hints {
                let _ = writeln!(block, "    \"{}\": \"{}\",", hint.name, hint.hint);
            }
        }
        None => {
            for (name, hint) in default_field_hints(domain) {
                let _ = writeln!(block, "    \"{}\": \"{}\",", name, hint);
            }
        }
    }
    // Drop the trailing comma so the block reads as plausible JSON.
    if block.ends_with(",\n") {
        block.truncate(block.len() - 2);
        block.push('\n');
    }
    block.push('}');
    block
}

/// Render the generation instruction for one model call. Same inputs
/// always produce the same prompt string.
pub fn build_generation_prompt(
    domain: DataDomain,
    sample_count: usize,
    schema_hint: Option<&[FieldHint]>,
) -> String {
    let schema = render_schema_block(domain, schema_hint);
    format!(
        "Generate EXACTLY {count} synthetic {domain} records in JSON format.\n\
         Each record must be realistic and follow this schema:\n\
         {schema}\n\n\
         IMPORTANT:\n\
         1. You MUST generate EXACTLY {count} records\n\
         2. Reply with ONLY a fenced JSON array containing exactly {count} objects:\n\
         ```json\n\
         [ {{ ... }}, {{ ... }} ]\n\
         ```\n\
         3. Do not include any text outside the fenced block\n\
         4. Each object in the array must carry every schema field\n\
         5. Generate realistic data that matches the {domain} domain\n\
         6. Each record must be unique and different from the others",
        count = sample_count,
        domain = domain,
        schema = schema,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_generation_prompt(DataDomain::Health, 10, None);
        let b = build_generation_prompt(DataDomain::Health, 10, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_names_count_domain_and_fields() {
        let prompt = build_generation_prompt(DataDomain::Ecommerce, 7, None);
        assert!(prompt.contains("EXACTLY 7"));
        assert!(prompt.contains("ecommerce records"));
        for field in DataDomain::Ecommerce.default_schema() {
            assert!(prompt.contains(field), "missing field {}", field);
        }
    }

    #[test]
    fn test_schema_hint_replaces_builtin_fields() {
        let hints = vec![
            FieldHint::new("ticker", "string"),
            FieldHint::new("close", "float"),
        ];
        let prompt = build_generation_prompt(DataDomain::Business, 3, Some(&hints));
        assert!(prompt.contains("\"ticker\": \"string\""));
        assert!(prompt.contains("\"close\": \"float\""));
        assert!(!prompt.contains("company_id"));
    }

    #[test]
    fn test_hint_table_matches_domain_schema() {
        for domain in DataDomain::ALL {
            let hinted: Vec<&str> = default_field_hints(domain).iter().map(|(n, _)| *n).collect();
            assert_eq!(hinted, domain.default_schema(), "hint table drifted for {}", domain);
        }
    }
}
