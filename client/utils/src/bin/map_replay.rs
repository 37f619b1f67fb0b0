use std::env;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use wograld_client::{
    group_into_clumps, ClientMap, ClientSettings, MapCommand, MapUpdateListener, MapUpdater,
    MAX_MAP_SIZE,
};
use wograld_core::Point;

struct BatchPrinter {
    batch: usize,
}

impl MapUpdateListener for BatchPrinter {
    fn map_changed(&mut self, _map: &ClientMap, squares: &[Point]) {
        self.batch += 1;
        let clumps = group_into_clumps(squares);
        println!(
            "batch {}: {} squares in {} clumps",
            self.batch,
            squares.len(),
            clumps.len()
        );
        for clump in &clumps {
            let squares: Vec<String> = clump
                .squares()
                .iter()
                .map(|p| format!("({},{})", p.x, p.y))
                .collect();
            println!("  {}", squares.join(" "));
        }
    }

    fn new_map(&mut self, width: i32, height: i32) {
        println!("new map {width}x{height}");
    }

    fn map_scrolled(&mut self, dx: i32, dy: i32) {
        println!("scrolled by ({dx},{dy})");
    }
}

/// Ground floor as text: `#` face, `~` fog of war, `.` nothing.
fn render_ground(updater: &MapUpdater) -> String {
    let map = updater.map();
    let mut out = String::new();
    for y in 0..updater.map_height() {
        for x in 0..updater.map_width() {
            let c = match map.square(x, y) {
                Some(square) if square.is_fog_of_war(0).unwrap_or(false) => '~',
                Some(square) if !square.is_empty_floor(0).unwrap_or(true) => '#',
                _ => '.',
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut script = None;
    let mut settings_path = None;
    let mut log_level = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--settings" => {
                i += 1;
                settings_path = Some(args.get(i).context("--settings needs a file")?.clone());
            }
            "--log-level" => {
                i += 1;
                log_level = Some(args.get(i).context("--log-level needs a level")?.clone());
            }
            arg if script.is_none() => script = Some(arg.to_string()),
            arg => bail!("unexpected argument {arg:?}"),
        }
        i += 1;
    }

    let Some(script) = script else {
        eprintln!("Usage: map-replay <script.json> [--settings <file>] [--log-level <level>]");
        std::process::exit(1);
    };

    let settings = settings_path
        .map(|path| ClientSettings::load(Path::new(&path)))
        .unwrap_or_default();
    let level = log_level.unwrap_or_else(|| settings.log_level.clone());
    wograld_core::initialize_logger(
        wograld_core::parse_level_filter(&level),
        settings.log_file.as_deref(),
    )?;

    let text = fs::read_to_string(&script).with_context(|| format!("unable to read {script}"))?;
    let commands: Vec<MapCommand> =
        serde_json::from_str(&text).with_context(|| format!("invalid map script {script}"))?;
    log::info!("replaying {} map commands from {script}", commands.len());

    let sizes = 1..=MAX_MAP_SIZE;
    if !sizes.contains(&settings.map_width) || !sizes.contains(&settings.map_height) {
        bail!(
            "map size {}x{} must be between 1 and {MAX_MAP_SIZE}",
            settings.map_width,
            settings.map_height
        );
    }
    let mut updater = MapUpdater::new(settings.map_width, settings.map_height);
    updater.add_listener(Box::new(BatchPrinter { batch: 0 }));
    for command in &commands {
        updater.apply(command);
    }
    updater.map_end_if_dirty();

    print!("{}", render_ground(&updater));
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
