use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use subforge::optimizer::SearchResult;
use subforge::scorer::ModelInfo;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn label(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

pub fn print_search_result(result: &SearchResult) {
    let mut table = new_table();
    let status = if result.consolidated {
        Cell::new("confirmed").fg(Color::Green)
    } else {
        Cell::new("unconfirmed").fg(Color::Yellow)
    };

    table.add_row(vec![label("Alphabet"), Cell::new(&result.alphabet)]);
    table.add_row(vec![label("Key"), Cell::new(&result.key).fg(Color::Cyan)]);
    table.add_row(vec![label("Fitness"), Cell::new(format!("{:.2}", result.fitness))]);
    table.add_row(vec![label("Status"), status]);
    table.add_row(vec![label("Rounds"), Cell::new(result.nbr_rounds)]);
    table.add_row(vec![label("Keys"), Cell::new(result.nbr_keys)]);
    table.add_row(vec![label("Seconds"), Cell::new(format!("{:.3}", result.seconds))]);
    table.add_row(vec![
        label("Keys/s"),
        Cell::new(format!("{:.0}", result.keys_per_second)),
    ]);

    println!("{}", table);
    println!("{}", result);
    println!();
    println!("{}", result.plaintext.trim_end());
}

pub fn print_model_info(info: &ModelInfo, distinct: usize) {
    let mut table = new_table();
    table.add_row(vec![label("Alphabet"), Cell::new(&info.alphabet)]);
    table.add_row(vec![label("Quadgrams counted"), Cell::new(info.nbr_quadgrams)]);
    table.add_row(vec![label("Distinct quadgrams"), Cell::new(distinct)]);
    table.add_row(vec![
        label("Most frequent"),
        Cell::new(&info.most_frequent_quadgram).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        label("Max fitness"),
        Cell::new(format!("{:.2}", info.max_fitness)),
    ]);
    table.add_row(vec![
        label("Average fitness"),
        Cell::new(format!("{:.2}", info.average_fitness)),
    ]);
    println!("{}", table);
}

pub fn print_top_quadgrams(entries: &[(String, f32)]) {
    let mut table = new_table();
    table.set_header(vec![label("#"), label("Quadgram"), label("Weight")]);
    for (rank, (quadgram, weight)) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(quadgram),
            Cell::new(format!("{:.2}", weight)),
        ]);
    }
    for i in [0, 2] {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{}", table);
}
