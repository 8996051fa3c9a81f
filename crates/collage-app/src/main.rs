// ABOUTME: Main application entry point.
// ABOUTME: Parses one editing gesture from the command line and applies it to a layout file.

mod document;
mod preview;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use collage_core::{Config, DataUrlDecoder, LayoutStore, PhotoId, SourceFile, Wheel};
use collage_layout::{
    Axis, Consent, Direction, DragController, DragKind, Heal, LayoutError, Point, Size,
};
use document::Document;

#[derive(Parser)]
#[command(name = "collage")]
#[command(about = "Arrange photos on a resizable, mergeable grid")]
struct Cli {
    /// Config file (defaults to ~/.config/photo-collage/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Down,
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Down => Direction::Down,
            DirectionArg::Right => Direction::Right,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AxisArg {
    Rows,
    Columns,
}

impl From<AxisArg> for Axis {
    fn from(value: AxisArg) -> Self {
        match value {
            AxisArg::Rows => Axis::Rows,
            AxisArg::Columns => Axis::Columns,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ZoomArg {
    In,
    Out,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new empty layout
    New {
        file: PathBuf,
        #[arg(long)]
        rows: Option<u32>,
        #[arg(long)]
        cols: Option<u32>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Print a text preview and summary
    Show {
        file: PathBuf,
        #[arg(long, default_value_t = 64)]
        width: usize,
        #[arg(long, default_value_t = 24)]
        height: usize,
    },
    /// Add image files to the gallery
    AddPhotos {
        file: PathBuf,
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Put a gallery photo into the cell covering ROW,COL
    Place {
        file: PathBuf,
        row: u32,
        col: u32,
        photo: String,
    },
    /// Take the photo out of a cell
    Unplace { file: PathBuf, row: u32, col: u32 },
    /// Merge a cell with its neighbours
    Grow {
        file: PathBuf,
        row: u32,
        col: u32,
        direction: DirectionArg,
        /// Keep growing until blocked or at the edge
        #[arg(long)]
        to_edge: bool,
    },
    /// Reduce a cell's span by one
    Shrink {
        file: PathBuf,
        row: u32,
        col: u32,
        direction: DirectionArg,
    },
    /// Delete a cell and let a neighbour fill the hole
    Delete {
        file: PathBuf,
        row: u32,
        col: u32,
        /// Delete even if the cell holds a photo
        #[arg(long)]
        yes: bool,
    },
    AddRow { file: PathBuf },
    AddColumn { file: PathBuf },
    RemoveRow {
        file: PathBuf,
        #[arg(long)]
        yes: bool,
    },
    RemoveColumn {
        file: PathBuf,
        #[arg(long)]
        yes: bool,
    },
    /// Drag a divider by PIXELS on a canvas EXTENT pixels long
    Resize {
        file: PathBuf,
        axis: AxisArg,
        divider: usize,
        #[arg(allow_hyphen_values = true)]
        pixels: f64,
        #[arg(long, default_value_t = 1000.0)]
        extent: f64,
    },
    /// Make every track on an axis equal again
    ResetTracks { file: PathBuf, axis: AxisArg },
    /// Zoom the photo in a cell by wheel notches
    Zoom {
        file: PathBuf,
        row: u32,
        col: u32,
        direction: ZoomArg,
        #[arg(long, default_value_t = 1)]
        notches: u32,
    },
    /// Rotate the photo in a cell
    Rotate {
        file: PathBuf,
        row: u32,
        col: u32,
        #[arg(allow_hyphen_values = true)]
        degrees: f64,
    },
    /// Pan the photo in a cell by DX,DY pixels on a WIDTH x HEIGHT canvas
    Pan {
        file: PathBuf,
        row: u32,
        col: u32,
        #[arg(allow_hyphen_values = true)]
        dx: f64,
        #[arg(allow_hyphen_values = true)]
        dy: f64,
        #[arg(long, default_value_t = 1000.0)]
        width: f64,
        #[arg(long, default_value_t = 1000.0)]
        height: f64,
    },
    /// Store a layout file under a name
    Save { file: PathBuf, name: String },
    /// Write a stored layout out to a file
    Open { name: String, file: PathBuf },
    /// List stored layouts
    List,
}

fn consent(yes: bool) -> Consent {
    if yes {
        Consent::Given
    } else {
        Consent::NotGiven
    }
}

/// Turn engine refusals into messages a user can act on
fn explain(err: LayoutError) -> anyhow::Error {
    match err {
        LayoutError::RequiresConfirmation(target) => {
            anyhow::anyhow!("{target} holds photos; pass --yes to discard them")
        }
        other => other.into(),
    }
}

fn edit(config: &Config, file: &Path, f: impl FnOnce(&mut Document) -> Result<()>) -> Result<()> {
    let mut doc = Document::load(config, file)?;
    f(&mut doc)?;
    doc.save(file)
}

fn show(doc: &Document, width: usize, height: usize) {
    println!("{}", preview::render(&doc.grid, &doc.gallery, width, height));
    println!();
    println!(
        "{}: {} x {} grid, {} cells, {} / {} photos, {} on canvas",
        doc.name,
        doc.grid.rows(),
        doc.grid.cols(),
        doc.grid.visible_cells().count(),
        doc.gallery.len(),
        doc.gallery.max_photos(),
        doc.grid.photos_on_canvas(),
    );
    println!("columns: {}", doc.grid.tracks().template(Axis::Columns));
    println!("rows:    {}", doc.grid.tracks().template(Axis::Rows));
    for photo in doc.gallery.photos() {
        println!("  {}  {}", photo.id, photo.original_filename);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => Config::load_or_default(),
    };

    match cli.command {
        Command::New {
            file,
            rows,
            cols,
            name,
        } => {
            if file.exists() {
                bail!("{} already exists", file.display());
            }
            Document::new(&config, name, rows, cols).save(&file)?;
        }
        Command::Show {
            file,
            width,
            height,
        } => show(&Document::load(&config, &file)?, width, height),
        Command::AddPhotos { file, images } => edit(&config, &file, |doc| {
            let mut sources = Vec::with_capacity(images.len());
            for path in &images {
                let bytes =
                    std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                sources.push(SourceFile::new(filename, None, bytes));
            }
            let report = doc.gallery.ingest(sources, &DataUrlDecoder);
            println!("added {} photo(s)", report.accepted.len());
            if report.rejected_non_image > 0 {
                println!("skipped {} non-image file(s)", report.rejected_non_image);
            }
            if report.rejected_over_capacity > 0 {
                println!(
                    "skipped {} file(s): gallery holds at most {} photos",
                    report.rejected_over_capacity,
                    doc.gallery.max_photos()
                );
            }
            for failure in &report.failed {
                println!("failed: {failure}");
            }
            Ok(())
        })?,
        Command::Place {
            file,
            row,
            col,
            photo,
        } => edit(&config, &file, |doc| {
            let photo = PhotoId(photo);
            if doc.gallery.get(&photo).is_none() {
                bail!("no photo {photo} in the gallery");
            }
            let cell = doc.cell_at(row, col)?;
            doc.grid.place_photo(&cell, photo)?;
            Ok(())
        })?,
        Command::Unplace { file, row, col } => edit(&config, &file, |doc| {
            let cell = doc.cell_at(row, col)?;
            if doc.grid.remove_photo(&cell)?.is_none() {
                println!("cell was already empty");
            }
            Ok(())
        })?,
        Command::Grow {
            file,
            row,
            col,
            direction,
            to_edge,
        } => edit(&config, &file, |doc| {
            let cell = doc.cell_at(row, col)?;
            if to_edge {
                let steps = doc.grid.spans().grow_to_edge(&cell, direction.into())?;
                println!("absorbed {steps} line(s)");
            } else {
                doc.grid.spans().grow(&cell, direction.into())?;
            }
            Ok(())
        })?,
        Command::Shrink {
            file,
            row,
            col,
            direction,
        } => edit(&config, &file, |doc| {
            let cell = doc.cell_at(row, col)?;
            doc.grid.spans().shrink(&cell, direction.into())?;
            Ok(())
        })?,
        Command::Delete {
            file,
            row,
            col,
            yes,
        } => edit(&config, &file, |doc| {
            let cell = doc.cell_at(row, col)?;
            let heal = doc
                .grid
                .spans()
                .delete_cell(&cell, consent(yes))
                .map_err(explain)?;
            match heal {
                Heal::Above(id) => println!("{id} grew down to fill the space"),
                Heal::Left(id) => println!("{id} grew right to fill the space"),
                Heal::Gap => println!("space left empty"),
            }
            Ok(())
        })?,
        Command::AddRow { file } => edit(&config, &file, |doc| {
            doc.grid.append_row();
            Ok(())
        })?,
        Command::AddColumn { file } => edit(&config, &file, |doc| {
            doc.grid.append_column();
            Ok(())
        })?,
        Command::RemoveRow { file, yes } => edit(&config, &file, |doc| {
            doc.grid.remove_last_row(consent(yes)).map_err(explain)
        })?,
        Command::RemoveColumn { file, yes } => edit(&config, &file, |doc| {
            doc.grid.remove_last_column(consent(yes)).map_err(explain)
        })?,
        Command::Resize {
            file,
            axis,
            divider,
            pixels,
            extent,
        } => edit(&config, &file, |doc| {
            let axis = Axis::from(axis);
            let canvas = match axis {
                Axis::Rows => Size::new(1.0, extent),
                Axis::Columns => Size::new(extent, 1.0),
            };
            let mut drag = DragController::new();
            drag.begin_drag(
                &doc.grid,
                DragKind::Divider {
                    axis,
                    index: divider,
                },
                Point::default(),
            )?;
            let target = match axis {
                Axis::Rows => Point::new(0.0, pixels),
                Axis::Columns => Point::new(pixels, 0.0),
            };
            let moved = drag.drag_to(&mut doc.grid, target, canvas);
            drag.end_drag();
            if !moved {
                bail!("divider {divider} cannot move that far");
            }
            Ok(())
        })?,
        Command::ResetTracks { file, axis } => edit(&config, &file, |doc| {
            doc.grid.tracks_mut().reset(axis.into());
            Ok(())
        })?,
        Command::Zoom {
            file,
            row,
            col,
            direction,
            notches,
        } => edit(&config, &file, |doc| {
            let cell = doc.cell_at(row, col)?;
            let Some(placement) = doc.grid.placement_mut(&cell)? else {
                bail!("cell {row},{col} has no photo");
            };
            let notch = match direction {
                ZoomArg::In => Wheel::Up,
                ZoomArg::Out => Wheel::Down,
            };
            for _ in 0..notches {
                placement.wheel(notch, config.placement.zoom_step);
            }
            println!("scale {:.2}", placement.scale);
            Ok(())
        })?,
        Command::Rotate {
            file,
            row,
            col,
            degrees,
        } => edit(&config, &file, |doc| {
            let cell = doc.cell_at(row, col)?;
            let Some(placement) = doc.grid.placement_mut(&cell)? else {
                bail!("cell {row},{col} has no photo");
            };
            placement.rotate_by(degrees);
            Ok(())
        })?,
        Command::Pan {
            file,
            row,
            col,
            dx,
            dy,
            width,
            height,
        } => edit(&config, &file, |doc| {
            let cell = doc.cell_at(row, col)?;
            let mut drag = DragController::new();
            drag.begin_drag(&doc.grid, DragKind::Pan { cell }, Point::default())?;
            drag.drag_to(&mut doc.grid, Point::new(dx, dy), Size::new(width, height));
            drag.end_drag();
            Ok(())
        })?,
        Command::Save { file, name } => {
            let doc = Document::load(&config, &file)?;
            let store = LayoutStore::open_default()?;
            let path = store.save(&name, &doc.to_record())?;
            tracing::info!("Stored layout {} at {}", name, path.display());
            println!("saved as {name}");
        }
        Command::Open { name, file } => {
            let store = LayoutStore::open_default()?;
            let record = store.load(&name)?;
            let (doc, report) = Document::from_record(&config, &record);
            if !report.is_clean() {
                println!("layout needed repairs: {report:?}");
            }
            doc.save(&file)?;
        }
        Command::List => {
            let store = LayoutStore::open_default()?;
            for name in store.list()? {
                println!("{name}");
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting collage");

    run(Cli::parse())
}
