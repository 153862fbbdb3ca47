//! Row population
//!
//! Before any record is read, every requested field is resolved once into a
//! column source: read directly from the record, read from the nested record
//! held by one of the record's fields, or (under the `FillAbsent` policy)
//! left unresolved. Rows are then produced by applying the plan to each
//! record.

use itertools::Itertools;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::config::{ConversionConfig, UnresolvedFieldPolicy};
use crate::error::{Result, TableError};
use crate::schema::{FieldDescriptor, Record, ValueType};
use crate::table::{CellValue, Row, Table};

/// Where the cells of one column come from
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ColumnSource {
    /// A field of the record type itself
    Direct(FieldDescriptor),
    /// A field of the nested record held by `parents[parent]`
    Nested {
        parent: usize,
        field: FieldDescriptor,
    },
    /// A field that could not be traced to the record type
    Unresolved(FieldDescriptor),
}

impl ColumnSource {
    fn describe(&self, parents: &[FieldDescriptor]) -> String {
        match self {
            ColumnSource::Direct(field) => field.qualified_name(),
            ColumnSource::Nested { parent, field } => {
                format!("{} via {}", field.qualified_name(), parents[*parent].name())
            }
            ColumnSource::Unresolved(field) => format!("{} (unresolved)", field.qualified_name()),
        }
    }
}

/// Resolved column sources for one record type
#[derive(Debug, Clone)]
pub(crate) struct RowPlan {
    /// Fields of the record type whose nested values feed at least one column
    parents: Vec<FieldDescriptor>,
    sources: Vec<ColumnSource>,
}

impl RowPlan {
    /// Resolve `fields` against the record type `T`
    ///
    /// A field is direct when it is one of `T`'s own fields. Otherwise the
    /// unique field of `T` whose value type is the field's declaring type
    /// becomes its parent.
    pub(crate) fn resolve<T: Record>(
        fields: &[FieldDescriptor],
        policy: UnresolvedFieldPolicy,
    ) -> Result<Self> {
        let own_fields = T::field_descriptors();
        let mut parents: Vec<FieldDescriptor> = Vec::new();
        let mut sources = Vec::with_capacity(fields.len());

        for field in fields {
            if own_fields.contains(field) {
                sources.push(ColumnSource::Direct(field.clone()));
                continue;
            }

            match find_parent(&own_fields, field) {
                Ok(parent) => {
                    let index = match parents.iter().position(|known| known == parent) {
                        Some(index) => index,
                        None => {
                            parents.push(parent.clone());
                            parents.len() - 1
                        }
                    };
                    sources.push(ColumnSource::Nested {
                        parent: index,
                        field: field.clone(),
                    });
                }
                Err(reason) => match policy {
                    UnresolvedFieldPolicy::Fail => {
                        return Err(TableError::schema_mismatch(format!(
                            "cannot resolve `{}` against `{}`: {reason}",
                            field.qualified_name(),
                            T::TYPE_NAME
                        )));
                    }
                    UnresolvedFieldPolicy::FillAbsent => {
                        debug!(
                            "Filling column `{}` with absent values: {reason}",
                            field.qualified_name()
                        );
                        sources.push(ColumnSource::Unresolved(field.clone()));
                    }
                },
            }
        }

        let plan = Self { parents, sources };
        debug!(
            "Resolved {} columns for `{}`: [{}]",
            plan.sources.len(),
            T::TYPE_NAME,
            plan.sources
                .iter()
                .map(|source| source.describe(&plan.parents))
                .join(", ")
        );
        Ok(plan)
    }

    /// Mark columns nullable when their cells can be absent regardless of
    /// the field's own nullability
    pub(crate) fn apply_nullability(&self, table: &mut Table) {
        for (index, source) in self.sources.iter().enumerate() {
            let forced = match source {
                ColumnSource::Direct(_) => false,
                ColumnSource::Nested { parent, .. } => self.parents[*parent].is_nullable(),
                ColumnSource::Unresolved(_) => true,
            };
            if forced {
                if let Some(column) = table.column_mut(index) {
                    column.set_nullable(true);
                }
            }
        }
    }

    /// Produce the row for one record
    pub(crate) fn read_row<T: Record>(&self, record: &T, validate: bool) -> Result<Row> {
        let parent_values = self
            .parents
            .iter()
            .map(|parent| record.read_field(parent))
            .collect::<Result<SmallVec<[CellValue; 4]>>>()?;

        let mut values = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let (field, value) = match source {
                ColumnSource::Direct(field) => (field, record.read_field(field)?),
                ColumnSource::Nested { parent, field } => {
                    let value =
                        read_nested(&self.parents[*parent], &parent_values[*parent], field)?;
                    (field, value)
                }
                ColumnSource::Unresolved(_) => {
                    values.push(CellValue::Absent);
                    continue;
                }
            };

            if validate && !value.conforms_to(field.value_type()) {
                return Err(TableError::field_access(
                    field,
                    format!(
                        "declared as {} but read a {} value",
                        field.value_type(),
                        value.kind()
                    ),
                ));
            }
            values.push(value);
        }
        Ok(Row::new(values))
    }
}

/// Find the unique field of the record type holding `field`'s declaring type
fn find_parent<'a>(
    own_fields: &'a [FieldDescriptor],
    field: &FieldDescriptor,
) -> std::result::Result<&'a FieldDescriptor, String> {
    let declaring_type = field.declaring_type();
    let candidates: Vec<&FieldDescriptor> = own_fields
        .iter()
        .filter(|candidate| candidate.value_type() == ValueType::Record(declaring_type))
        .collect();

    match candidates.as_slice() {
        [parent] => {
            if declaring_type.fields().contains(field) {
                Ok(*parent)
            } else {
                Err(format!("`{declaring_type}` declares no field `{}`", field.name()))
            }
        }
        [] => Err(format!("no field holds a `{declaring_type}` record")),
        several => Err(format!(
            "`{declaring_type}` is reachable through several fields: {}",
            several.iter().map(|parent| parent.name()).join(", ")
        )),
    }
}

/// Read `field` from the nested value held by `parent`
fn read_nested(
    parent: &FieldDescriptor,
    parent_value: &CellValue,
    field: &FieldDescriptor,
) -> Result<CellValue> {
    match parent_value {
        CellValue::Absent => Ok(CellValue::Absent),
        CellValue::Record(nested) => nested.read(field).cloned().ok_or_else(|| {
            TableError::field_access(
                field,
                format!("missing from the value of `{}`", parent.name()),
            )
        }),
        other => Err(TableError::field_access(
            parent,
            format!(
                "expected a `{}` record, found a {} value",
                field.declaring_type(),
                other.kind()
            ),
        )),
    }
}

/// Append one row per record, in input order
pub(crate) fn populate_rows<'a, T, I>(
    table: &mut Table,
    plan: &RowPlan,
    records: I,
    config: &ConversionConfig,
) -> Result<()>
where
    T: Record,
    I: IntoIterator<Item = &'a T>,
{
    for (index, record) in records.into_iter().enumerate() {
        if config.is_cancelled() {
            return Err(TableError::Cancelled { rows: index });
        }
        let row = plan.read_row(record, config.validate_cells)?;
        trace!("Converted `{}` record {index}", T::TYPE_NAME);
        table.push_row(row)?;
    }
    Ok(())
}
