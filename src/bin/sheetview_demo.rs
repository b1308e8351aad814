//! Demo driver for sheetview - scripts a session on a 20x50 sheet and
//! prints the final snapshot as JSON
//!
//! Usage:
//!   sheetview_demo                          # Snapshot JSON to stdout
//!   sheetview_demo --config sheet.json      # Load engine tunables first
//!   sheetview_demo -o snapshot.json         # Write the snapshot to a file
//!
//! Set `RUST_LOG=sheetview=debug` to watch the lifecycle events.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::cell::RefCell;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::rc::Rc;

use sheetview::{
    CellHandle, CellIndex, CellRegistry, DataProvider, HeaderCell, Point, Selection, SheetArea,
    SheetConfig, SheetEvents, SheetView, Size, TextCell,
};
use tracing_subscriber::EnvFilter;

const COLUMNS: usize = 20;
const ROWS: usize = 50;

struct DemoProvider {
    data: Vec<String>,
}

impl DemoProvider {
    fn new() -> Self {
        let data = (0..ROWS)
            .flat_map(|y| (0..COLUMNS).map(move |x| format!("Col: {x}, Row: {y}")))
            .collect();
        Self { data }
    }

    fn datum(&self, index: CellIndex) -> String {
        usize::try_from(index.flat)
            .ok()
            .and_then(|i| self.data.get(i))
            .cloned()
            .unwrap_or_default()
    }

    fn set_datum(&mut self, index: CellIndex, text: String) {
        if let Some(slot) = usize::try_from(index.flat).ok().and_then(|i| self.data.get_mut(i)) {
            *slot = text;
        }
    }
}

impl DataProvider for DemoProvider {
    fn column_count(&self) -> usize {
        COLUMNS
    }

    fn row_count(&self) -> usize {
        ROWS
    }

    fn column_width(&self, index: usize) -> Option<f64> {
        Some(100.0 + (index % 3) as f64 * 150.0)
    }

    fn row_height(&self, index: usize) -> Option<f64> {
        Some(100.0 + (index % 4) as f64 * 50.0)
    }

    fn fixed_row_count(&self, area: SheetArea) -> usize {
        match area {
            SheetArea::FixedTop => 2,
            _ => 0,
        }
    }

    fn fixed_row_height(&self, _index: usize, _area: SheetArea) -> Option<f64> {
        Some(44.0)
    }

    fn cell_for(
        &mut self,
        index: CellIndex,
        area: SheetArea,
        cells: &mut CellRegistry,
    ) -> Option<CellHandle> {
        match area {
            SheetArea::FixedTop => {
                let mut cell = cells.dequeue("header").ok()?;
                let header = cell.downcast_mut::<HeaderCell>()?;
                header.title = if index.row == 0 {
                    format!("Header: {}", index.col)
                } else {
                    format!("Subheader: {}", index.col)
                };
                Some(cell)
            }
            SheetArea::Content => {
                let mut cell = cells.dequeue("text").ok()?;
                cell.downcast_mut::<TextCell>()?.text = self.datum(index);
                Some(cell)
            }
            SheetArea::FixedLeft => None,
        }
    }

    fn editor_for(&mut self, index: CellIndex, _cells: &mut CellRegistry) -> Option<CellHandle> {
        (index.row % 3 != 0).then(|| Box::new(TextCell::new(self.datum(index))) as CellHandle)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config_path = None;
    let mut output_path = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                config_path = Some(args[i + 1].clone());
                i += 2;
            }
            "-o" if i + 1 < args.len() => {
                output_path = Some(args[i + 1].clone());
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: sheetview_demo [--config config.json] [-o output.json]");
                std::process::exit(1);
            }
        }
    }

    let config = match config_path {
        Some(path) => match SheetConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SheetConfig::default(),
    };

    let mut sheet = SheetView::new(DemoProvider::new(), config);
    sheet.set_bounds(Size::new(1024.0, 768.0));
    let registered = sheet
        .register("text", || Box::new(TextCell::default()))
        .and_then(|()| sheet.register("header", || Box::new(HeaderCell::default())));
    if let Err(e) = registered {
        eprintln!("Error registering cells: {}", e);
        std::process::exit(1);
    }

    let edits: Rc<RefCell<Vec<(CellIndex, String)>>> = Rc::default();
    let sink = Rc::clone(&edits);
    sheet.set_events(SheetEvents {
        did_end_editing: Some(Box::new(move |index: CellIndex, editor: CellHandle| {
            if let Some(text) = editor.downcast_ref::<TextCell>() {
                sink.borrow_mut()
                    .push((index, format!("{} (edited)", text.text)));
            }
        })),
        ..SheetEvents::default()
    });

    sheet.reload_data();

    // Scroll down and across, then back part of the way.
    for step in 1..=8 {
        sheet.scroll_by(60.0, 120.0 * f64::from(step));
    }
    sheet.set_content_offset(Point::new(400.0, 900.0));

    // Tap the first frozen header, then select a block of cells.
    sheet.tap(Point::new(10.0, 10.0));
    sheet.set_selection(Selection::cell_range(2, 6, 4, 9), true);

    // Edit a cell and fold the edit back into the data.
    let target = sheet.make_index(3, 7);
    sheet.edit_cell_at(target);
    sheet.end_edit_cell();
    for (index, text) in edits.borrow_mut().drain(..) {
        sheet.provider_mut().set_datum(index, text);
        sheet.reload_cell_at(index);
    }

    // Widen a column through an interactive session.
    sheet.begin_resizing_column(3);
    sheet.update_resizing(3, 320.0);
    sheet.end_resizing();

    let json = match sheet.snapshot().to_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing snapshot: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(output) = output_path {
        if let Err(e) = fs::write(&output, &json) {
            eprintln!("Error writing {}: {}", output, e);
            std::process::exit(1);
        }
        eprintln!("Wrote {} bytes to {}", json.len(), output);
    } else {
        io::stdout().write_all(json.as_bytes()).unwrap();
        println!();
    }
}
