//! The fixed model input schema.

/// Model input columns, in the order the model was trained on.
pub const FEATURE_COLUMNS: [&str; 20] = [
    "store",
    "promo",
    "store_type",
    "assortment",
    "competition_distance",
    "competition_open_since_month",
    "competition_open_since_year",
    "promo2",
    "promo2_since_week",
    "promo2_since_year",
    "competition_time_month",
    "promo_time_week",
    "day_of_week_sin",
    "day_of_week_cos",
    "month_cos",
    "month_sin",
    "day_sin",
    "day_cos",
    "week_of_year_cos",
    "week_of_year_sin",
];

/// Number of model input columns.
pub const N_FEATURES: usize = FEATURE_COLUMNS.len();

/// Position of a column in the model input, if it is one.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|c| *c == name)
}
