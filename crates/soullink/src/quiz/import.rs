use super::schema::{Pillar, Question, QuestionBank, QuestionId, SchemaError};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum QuestionBankImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Schema(SchemaError),
}

impl std::fmt::Display for QuestionBankImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionBankImportError::Io(err) => write!(f, "failed to read question bank: {}", err),
            QuestionBankImportError::Csv(err) => {
                write!(f, "invalid question bank CSV data: {}", err)
            }
            QuestionBankImportError::Schema(err) => {
                write!(f, "question bank is not well formed: {}", err)
            }
        }
    }
}

impl std::error::Error for QuestionBankImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuestionBankImportError::Io(err) => Some(err),
            QuestionBankImportError::Csv(err) => Some(err),
            QuestionBankImportError::Schema(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for QuestionBankImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for QuestionBankImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<SchemaError> for QuestionBankImportError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

/// Loads question banks from `id,text,pillar,hint` CSV exports.
pub struct QuestionBankImporter;

impl QuestionBankImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<QuestionBank, QuestionBankImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<QuestionBank, QuestionBankImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut questions = Vec::new();

        for record in csv_reader.deserialize::<QuestionRow>() {
            let row = record?;
            questions.push(Question {
                id: QuestionId(row.id),
                text: row.text,
                pillar: Pillar::new(row.pillar),
                hint: row.hint,
            });
        }

        let bank = QuestionBank::from_questions(questions)?;
        tracing::debug!(
            questions = bank.len(),
            pillars = bank.pillars().len(),
            "imported question bank"
        );
        Ok(bank)
    }
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    id: String,
    text: String,
    pillar: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    hint: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_rows_in_order_with_optional_hints() {
        let data = "id,text,pillar,hint\n\
                    h1,I tell the truth.,Honesty,Truth over harmony\n\
                    s1,  I keep routines.  ,Stability,\n\
                    h2,I share my plans.,Honesty,\n";

        let bank = QuestionBankImporter::from_reader(data.as_bytes()).expect("bank imports");

        assert_eq!(bank.len(), 3);
        assert_eq!(
            bank.pillars(),
            &[Pillar::new("Honesty"), Pillar::new("Stability")]
        );
        let s1 = bank.question("s1").expect("s1 present");
        assert_eq!(s1.text, "I keep routines.");
        assert!(s1.hint.is_none());
        assert_eq!(
            bank.question("h1").and_then(|q| q.hint.as_deref()),
            Some("Truth over harmony")
        );
    }

    #[test]
    fn schema_violations_surface_as_import_errors() {
        let data = "id,text,pillar,hint\nq1,One,Growth,\nq1,Two,Growth,\n";

        let err = QuestionBankImporter::from_reader(data.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            QuestionBankImportError::Schema(SchemaError::DuplicateQuestion(_))
        ));
    }

    #[test]
    fn empty_export_is_rejected() {
        let err = QuestionBankImporter::from_reader("id,text,pillar,hint\n".as_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            QuestionBankImportError::Schema(SchemaError::EmptyBank)
        ));
    }
}
