//! Bulk item operations: CSV export, CSV import and batch delete.
//!
//! # Responsibility
//! - Reuse the list predicates to select export rows.
//! - Apply import rows one by one, collecting per-row errors.
//!
//! # Invariants
//! - Export is UTF-8 with a BOM and a fixed header.
//! - A rejected import row never affects the rows around it.
//! - Batch delete reports distinct non-blank ids, whether or not they existed.

use crate::model::item::{Item, ItemId, ItemPayload, ItemStatus};
use crate::model::text::{eq_ignore_case, fold_case};
use crate::query::{normalize_needle, ItemFilter, Listable};
use crate::repo::collection::Upserted;
use crate::repo::error::StoreError;
use crate::repo::item_repo::ItemRepository;
use crate::service::csv::{self, CsvError, BOM_CHAR, UTF8_BOM};
use crate::service::item_service::ItemService;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Column titles of the export format, in order.
pub const EXPORT_HEADER: [&str; 6] = ["ID", "Code", "Product name", "Status", "Category", "UoM"];

const CODE_COLUMN: &str = "Code";
const NAME_COLUMN: &str = "Product name";
const STATUS_COLUMN: &str = "Status";
const CATEGORY_COLUMN: &str = "Category";
const UOM_COLUMN: &str = "UoM";

/// Row selection for exports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFilter {
    /// Same free-text search as item lists.
    pub q: Option<String>,
    pub filter: ItemFilter,
    /// Identity allow-list; empty means every item.
    pub ids: Vec<ItemId>,
}

/// How import rows treat codes that already exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Create unknown codes and overwrite existing ones.
    #[default]
    Upsert,
    /// Create unknown codes; existing codes are row errors.
    CreateOnly,
}

impl ImportMode {
    /// Parses a mode name. Absent or blank selects `Upsert`.
    ///
    /// # Errors
    /// - `ImportError::UnknownMode` for any other value.
    pub fn parse(raw: Option<&str>) -> Result<Self, ImportError> {
        let value = raw.map(str::trim).unwrap_or_default();
        match value.to_ascii_lowercase().as_str() {
            "" | "upsert" => Ok(Self::Upsert),
            "create" | "create-only" | "create_only" | "createonly" => Ok(Self::CreateOnly),
            _ => Err(ImportError::UnknownMode(value.to_string())),
        }
    }
}

/// Import outcome summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub created: usize,
    pub updated: usize,
    pub errors: Vec<ImportRowError>,
}

/// Rejected import row. `row` is 1-based and excludes the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

/// Import payload that cannot be processed at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Payload is not UTF-8.
    InvalidUtf8,
    /// Payload has no header record.
    MissingHeader,
    /// Header lacks a required column.
    MissingColumn(&'static str),
    /// Quoting is broken.
    Malformed(CsvError),
    /// Mode name is not recognized.
    UnknownMode(String),
}

impl ImportError {
    /// Every framing error is a bad request.
    pub fn status_code(&self) -> u16 {
        400
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUtf8 => write!(f, "import payload is not valid UTF-8"),
            Self::MissingHeader => write!(f, "import payload has no header row"),
            Self::MissingColumn(column) => write!(f, "import header lacks column `{column}`"),
            Self::Malformed(err) => write!(f, "malformed import payload: {err}"),
            Self::UnknownMode(mode) => write!(f, "unknown import mode `{mode}`"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CsvError> for ImportError {
    fn from(value: CsvError) -> Self {
        Self::Malformed(value)
    }
}

/// Column positions resolved from the header.
struct ImportColumns {
    code: usize,
    name: usize,
    status: usize,
    category: usize,
    uom: usize,
}

impl ImportColumns {
    fn resolve(header: &[String]) -> Result<Self, ImportError> {
        let find = |title: &'static str| {
            header
                .iter()
                .position(|cell| eq_ignore_case(cell.trim_start_matches(BOM_CHAR).trim(), title))
                .ok_or(ImportError::MissingColumn(title))
        };
        Ok(Self {
            code: find(CODE_COLUMN)?,
            name: find(NAME_COLUMN)?,
            status: find(STATUS_COLUMN)?,
            category: find(CATEGORY_COLUMN)?,
            uom: find(UOM_COLUMN)?,
        })
    }

    fn payload(&self, record: &[String]) -> Result<ItemPayload, ImportRowError> {
        let cell = |index: usize| {
            record
                .get(index)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let status = match cell(self.status) {
            None => None,
            Some(raw) => Some(ItemStatus::parse(&raw).ok_or_else(|| ImportRowError {
                row: 0,
                field: "status".to_string(),
                message: format!("unknown status `{raw}`"),
            })?),
        };
        Ok(ItemPayload {
            code: cell(self.code),
            name: cell(self.name),
            status,
            category_name: cell(self.category),
            uom_base: cell(self.uom),
            description: None,
            uoms: Vec::new(),
        })
    }
}

impl<R: ItemRepository> ItemService<R> {
    /// Renders matching items as CSV, ordered by code.
    pub fn export_csv(&self, selection: &ExportFilter) -> Vec<u8> {
        let needle = normalize_needle(selection.q.as_deref());
        let mut items: Vec<Item> = self
            .repo()
            .snapshot()
            .into_iter()
            .filter(|item| {
                needle
                    .as_deref()
                    .map_or(true, |needle| item.matches_text(needle))
            })
            .filter(|item| item.matches_filter(&selection.filter))
            .filter(|item| {
                selection.ids.is_empty() || selection.ids.iter().any(|id| id == &item.id)
            })
            .collect();
        items.sort_by(|left, right| {
            fold_case(&left.code)
                .cmp(&fold_case(&right.code))
                .then_with(|| left.id.cmp(&right.id))
        });

        let mut text = String::new();
        csv::write_record(&mut text, EXPORT_HEADER);
        for item in &items {
            csv::write_record(
                &mut text,
                [
                    item.id.as_str(),
                    item.code.as_str(),
                    item.name.as_str(),
                    item.status.constant_name(),
                    item.category_name.as_str(),
                    item.uom_base.as_str(),
                ],
            );
        }
        info!(
            "event=item_export module=service status=ok rows={}",
            items.len()
        );

        let mut out = Vec::with_capacity(UTF8_BOM.len() + text.len());
        out.extend_from_slice(UTF8_BOM);
        out.extend_from_slice(text.as_bytes());
        out
    }

    /// Applies CSV rows in the export format.
    ///
    /// The `ID` column is ignored; `Code` decides create vs update and a
    /// blank code creates an item with a generated code.
    ///
    /// # Errors
    /// - `ImportError` when the payload cannot be framed at all. Row-level
    ///   problems are reported in `ImportResult::errors` instead.
    pub fn import_csv(&self, bytes: &[u8], mode: ImportMode) -> Result<ImportResult, ImportError> {
        let text = std::str::from_utf8(bytes).map_err(|_| ImportError::InvalidUtf8)?;
        let text = text.strip_prefix(BOM_CHAR).unwrap_or(text);
        let mut records = csv::parse_records(text)?.into_iter();
        let header = records.next().ok_or(ImportError::MissingHeader)?;
        let columns = ImportColumns::resolve(&header)?;

        let mut result = ImportResult::default();
        for (index, record) in records.enumerate() {
            let row = index + 1;
            let payload = match columns.payload(&record) {
                Ok(payload) => payload,
                Err(err) => {
                    result.errors.push(ImportRowError { row, ..err });
                    continue;
                }
            };
            let outcome = match mode {
                ImportMode::Upsert => self.repo().upsert_item(&payload),
                ImportMode::CreateOnly => self.repo().create_item(&payload).map(Upserted::Created),
            };
            match outcome {
                Ok(Upserted::Created(_)) => result.created += 1,
                Ok(Upserted::Updated(_)) => result.updated += 1,
                Err(err) => result.errors.push(row_error(row, &err)),
            }
        }

        if result.errors.is_empty() {
            info!(
                "event=item_import module=service status=ok created={} updated={}",
                result.created, result.updated
            );
        } else {
            warn!(
                "event=item_import module=service status=partial created={} updated={} rejected={}",
                result.created,
                result.updated,
                result.errors.len()
            );
        }
        Ok(result)
    }

    /// Removes every listed item that exists, without version checks.
    ///
    /// Returns the number of distinct non-blank ids supplied.
    pub fn batch_delete(&self, ids: &[Option<String>]) -> usize {
        let distinct: BTreeSet<ItemId> = ids
            .iter()
            .flatten()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        let targets: Vec<ItemId> = distinct.into_iter().collect();
        let removed = self.repo().remove_items(&targets);
        info!(
            "event=item_batch_delete module=service status=ok requested={} removed={}",
            targets.len(),
            removed
        );
        targets.len()
    }
}

fn row_error(row: usize, err: &StoreError) -> ImportRowError {
    let field = match err {
        StoreError::Validation(validation) => validation.field,
        _ => "code",
    };
    ImportRowError {
        row,
        field: field.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ImportError, ImportMode};

    #[test]
    fn import_mode_parses_known_names() {
        assert_eq!(ImportMode::parse(None), Ok(ImportMode::Upsert));
        assert_eq!(ImportMode::parse(Some(" ")), Ok(ImportMode::Upsert));
        assert_eq!(ImportMode::parse(Some("UPSERT")), Ok(ImportMode::Upsert));
        assert_eq!(
            ImportMode::parse(Some("create-only")),
            Ok(ImportMode::CreateOnly)
        );
        assert_eq!(
            ImportMode::parse(Some("merge")),
            Err(ImportError::UnknownMode("merge".to_string()))
        );
    }
}
