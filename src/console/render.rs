//! Text rendering for the console.

use crate::game::dice::FaceSet;
use crate::game::probability::ProbabilityMatrix;
use crate::game::session::{GameReport, Side};

/// Render a grid table:
///
/// ```text
/// +-----+-----+
/// | a   | b   |
/// +=====+=====+
/// | 1   | 2   |
/// +-----+-----+
/// ```
pub fn render_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0usize; columns];
    for line in std::iter::once(headers).chain(rows.iter().map(Vec::as_slice)) {
        for (col, cell) in line.iter().enumerate() {
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    let rule = |fill: char| -> String {
        let mut out = String::from("+");
        for width in &widths {
            out.extend(std::iter::repeat(fill).take(width + 2));
            out.push('+');
        }
        out.push('\n');
        out
    };
    let row = |cells: &[String]| -> String {
        let mut out = String::from("|");
        for (col, width) in widths.iter().enumerate() {
            let cell = cells.get(col).map(String::as_str).unwrap_or("");
            let pad = width - cell.chars().count();
            out.push(' ');
            out.push_str(cell);
            out.extend(std::iter::repeat(' ').take(pad + 1));
            out.push('|');
        }
        out.push('\n');
        out
    };

    let mut out = rule('-');
    out.push_str(&row(headers));
    out.push_str(&rule('='));
    for cells in rows {
        out.push_str(&row(cells.as_slice()));
        out.push_str(&rule('-'));
    }
    out
}

/// Help table: probability that the row die beats the column die.
pub fn render_probability_table(dice: &[FaceSet], matrix: &ProbabilityMatrix) -> String {
    let labels: Vec<String> = dice.iter().map(faces_label).collect();

    let headers: Vec<String> = std::iter::once("User dice v".to_string())
        .chain(labels.iter().cloned())
        .collect();
    let rows: Vec<Vec<String>> = matrix
        .rows()
        .zip(&labels)
        .map(|(cells, label)| {
            std::iter::once(label.clone())
                .chain(cells.iter().map(|cell| match cell {
                    Some(p) => format!("{:.4}", p.as_f64()),
                    None => "-".to_string(),
                }))
                .collect()
        })
        .collect();

    let mut out = String::new();
    out.push_str("The table below shows the probability of the user's die (row) ");
    out.push_str("beating the computer's die (column).\n");
    out.push_str("Ties count for neither side. A die is not compared with itself.\n");
    out.push_str(&render_grid(&headers, &rows));
    out
}

/// One-line game result.
pub fn render_summary(report: &GameReport) -> String {
    let (user, computer) = (report.user_roll, report.computer_roll);
    match report.winner {
        Some(Side::User) => format!("You win ({user} > {computer})!"),
        Some(Side::Computer) => format!("I win ({computer} > {user})!"),
        None => format!("It's a tie ({user} = {computer})!"),
    }
}

/// Faces joined with ", " for table labels.
fn faces_label(die: &FaceSet) -> String {
    die.faces()
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
