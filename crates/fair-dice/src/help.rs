//! Probability table shown on `?`.

use fair_dice_core::{DieSet, ProbabilityTable};

const TITLE: &str = "Probability of the win for the user:";
const CORNER: &str = "User dice v";

/// Render a boxed table: row die beating column die
pub fn render(dice: &DieSet) -> String {
    let table = ProbabilityTable::compute(dice);
    let labels: Vec<String> = dice
        .iter()
        .map(|die| {
            let faces: Vec<String> = die.faces().iter().map(i64::to_string).collect();
            faces.join(",")
        })
        .collect();

    let header = std::iter::once(CORNER.to_string()).chain(labels.iter().cloned());
    let mut rows = vec![header.collect::<Vec<_>>()];
    for (label, cells) in labels.iter().zip(table.rows()) {
        let probabilities = cells.iter().map(|cell| match cell {
            Some(p) => format!("{:.4}", p),
            None => "-".to_string(),
        });
        rows.push(std::iter::once(label.clone()).chain(probabilities).collect());
    }

    let widths: Vec<usize> = (0..rows[0].len())
        .map(|col| rows.iter().map(|row| row[col].len()).max().unwrap_or(0))
        .collect();
    let border: String = widths.iter().map(|w| format!("{}+", "-".repeat(w + 2))).collect();
    let border = format!("+{}", border);
    let line = |row: &[String]| -> String {
        let cells: String = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!(" {:<w$} |", cell, w = *w))
            .collect();
        format!("|{}", cells)
    };

    let mut out = vec![TITLE.to_string(), border.clone(), line(&rows[0]), border.clone()];
    out.extend(rows[1..].iter().map(|row| line(row)));
    out.push(border);
    out.join("\n")
}
