//! Column layout for name listings.

const GAP: usize = 2;

/// Lays `names` out column-major to fit `width` characters.
///
/// Falls back to one name per line when fewer than two columns fit. Every
/// row ends in a newline and carries no trailing whitespace.
pub fn format_columns(names: &[String], width: usize) -> String {
    if names.is_empty() {
        return String::new();
    }

    let lengths: Vec<usize> = names.iter().map(|name| name.chars().count()).collect();
    let longest = lengths.iter().copied().max().unwrap_or(0);

    let mut cols = (width + GAP) / (longest + GAP);
    if cols < 2 {
        return one_per_line(names);
    }

    let rows = names.len().div_ceil(cols);
    // Avoid empty trailing columns.
    cols = names.len().div_ceil(rows);
    let col_width = (width + GAP) / cols - GAP;

    let mut output = String::new();
    for row in 0..rows {
        let indices: Vec<usize> = (row..names.len()).step_by(rows).collect();
        let Some((&last, rest)) = indices.split_last() else {
            continue;
        };
        for &index in rest {
            output.push_str(&names[index]);
            let padding = col_width.saturating_sub(lengths[index]) + GAP;
            output.extend(std::iter::repeat(' ').take(padding));
        }
        output.push_str(&names[last]);
        output.push('\n');
    }
    output
}

fn one_per_line(names: &[String]) -> String {
    let mut output = names.join("\n");
    output.push('\n');
    output
}
