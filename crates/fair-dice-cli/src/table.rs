//! Plain-text rendering of the probability matrix.

use comfy_table::presets::ASCII_FULL_CONDENSED;
use comfy_table::Table;
use fair_dice_core::ProbabilityMatrix;

pub const TITLE: &str = "Probability Table (Winning chances for the user):";

const CORNER: &str = "User Dice \\ Computer Dice";

/// Render the matrix as a boxed table, one row per user die.
pub fn render(matrix: &ProbabilityMatrix) -> String {
    let labels: Vec<String> = (0..matrix.size()).map(|i| format!("Set {}", i)).collect();

    let mut table = Table::new();
    table.load_preset(ASCII_FULL_CONDENSED);
    table.set_header(std::iter::once(CORNER.to_string()).chain(labels.iter().cloned()));
    for (label, row) in labels.into_iter().zip(matrix.to_rows()) {
        table.add_row(std::iter::once(label).chain(row));
    }
    table.to_string()
}
