/// `group_type` of the dataset-wide row.
pub const OVERALL_GROUP_TYPE: &str = "overall";
/// `group_value` of the dataset-wide row.
pub const OVERALL_GROUP_VALUE: &str = "ALL";
/// `group_value` used for records with no value in the grouping column.
pub const MISSING_GROUP_VALUE: &str = "(missing)";

/// One row of the summary table.
///
/// `mean`/`min`/`max` are `None` when the value column is unresolved or the
/// group holds no numeric values.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub group_type: String,
    pub group_value: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SummaryRow {
    pub fn is_overall(&self) -> bool {
        self.group_type == OVERALL_GROUP_TYPE && self.group_value == OVERALL_GROUP_VALUE
    }
}
