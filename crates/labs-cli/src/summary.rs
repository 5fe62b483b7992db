use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use labs_cli::types::RunResult;
use labs_model::Flag;

pub fn print_summary(result: &RunResult) {
    println!("Input: {}", result.input.display());
    println!(
        "Records: {}  Columns: {}",
        result.records, result.columns
    );
    if !result.date_columns.is_empty() {
        println!("Date columns normalized: {}", result.date_columns.join(", "));
    }
    if result.flags.covered_tests.is_empty() {
        println!("No tests matched the reference ranges.");
    } else {
        println!(
            "Reference ranges applied for: {}",
            result.flags.covered_tests.join(", ")
        );
    }
    println!();
    println!("{}", mapping_table(result));
    println!("{}", flag_table(result));
    println!("{}", output_table(result));
}

fn mapping_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Role"), header_cell("Column")]);
    apply_summary_table_style(&mut table);
    for (role, column) in result.mapping.entries() {
        let column_cell = match column {
            Some(name) => Cell::new(name),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(role.as_str()), column_cell]);
    }
    table
}

fn flag_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Flag"), header_cell("Records")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for flag in Flag::ALL {
        let count = result.flags.count(flag);
        let color = match flag {
            Flag::Low => Color::Blue,
            Flag::High => Color::Red,
            Flag::Normal => Color::Green,
            Flag::Unknown => Color::Yellow,
        };
        table.add_row(vec![flag_cell(flag, color), count_cell(count, color)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.records).add_attribute(Attribute::Bold),
    ]);
    table
}

fn output_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Output"),
        header_cell("Path"),
        header_cell("Rows"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Cleaned CSV"),
        path_cell(&result.outputs.clean),
        Cell::new(result.records),
    ]);
    table.add_row(vec![
        Cell::new("Flags CSV"),
        path_cell(&result.outputs.flags),
        Cell::new(result.flagged_records),
    ]);
    table.add_row(vec![
        Cell::new("Summary CSV"),
        path_cell(&result.outputs.summary),
        Cell::new(result.summary.len()),
    ]);
    match &result.charts {
        Some(charts) if !charts.files.is_empty() => {
            table.add_row(vec![
                Cell::new("Charts"),
                path_cell(&charts.dir),
                Cell::new(charts.files.len()),
            ]);
        }
        Some(_) => {
            table.add_row(vec![
                Cell::new("Charts"),
                dim_cell("skipped (no numeric values or no test column)"),
                dim_cell(0),
            ]);
        }
        None => {
            table.add_row(vec![Cell::new("Charts"), dim_cell("-"), dim_cell("-")]);
        }
    }
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn flag_cell(flag: Flag, color: Color) -> Cell {
    Cell::new(flag.as_str()).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn path_cell(path: &Path) -> Cell {
    Cell::new(path.display())
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
