//! RPN-calculator style layout: menu and status strips, a stack column,
//! input/result rows and two browse panes, with Tab/Shift-Tab focus cycling
//! and a status line that reports the Vars pane's live geometry.
//!
//! Run with `cargo run --example calculator`; quit with `q`.

use std::error::Error;

use crossterm::terminal;
use sash::{
    AnsiRenderer, CellValue, CliDriver, FileSink, Logger, Rect, Shell, Size, WindowOption,
    WindowRegistry,
};

const STACK_WIDTH: u16 = 25;
const INPUT_WIDTH: u16 = 40;
const SIDE_WIDTH: u16 = STACK_WIDTH + INPUT_WIDTH;

fn main() -> Result<(), Box<dyn Error>> {
    let (width, height) = terminal::size()?;
    let mut registry = WindowRegistry::new(Size::new(width, height));
    build_windows(&mut registry)?;
    seed_content(&mut registry)?;

    let mut shell = Shell::new(registry, AnsiRenderer::with_default());
    if let Ok(sink) = FileSink::new("calculator-demo.log", 512 * 1024) {
        shell.config_mut().logger = Some(Logger::new(sink));
    }

    CliDriver::new(shell).run()?;
    Ok(())
}

fn build_windows(registry: &mut WindowRegistry) -> sash::Result<()> {
    let plain = [WindowOption::Borderless, WindowOption::Untitled];

    registry.insert(
        "Menu",
        |t: Size| Rect::new(0, 0, t.width.max(1), 1),
        &plain,
    )?;
    registry.insert(
        "Status",
        |t: Size| Rect::new(0, t.height.saturating_sub(1), t.width.max(1), 1),
        &plain,
    )?;
    registry.insert(
        "Stack",
        |t: Size| Rect::new(0, 1, STACK_WIDTH, t.height.saturating_sub(2).max(1)),
        &[],
    )?;
    registry.insert(
        "Input",
        |_: Size| Rect::new(STACK_WIDTH, 1, INPUT_WIDTH, 3),
        &[],
    )?;
    registry.insert(
        "Result",
        |t: Size| {
            Rect::new(
                SIDE_WIDTH,
                1,
                t.width.saturating_sub(SIDE_WIDTH).max(1),
                3,
            )
        },
        &[],
    )?;
    registry.insert(
        "Ops",
        |t: Size| {
            Rect::new(
                STACK_WIDTH,
                4,
                INPUT_WIDTH,
                t.height.saturating_sub(5).max(1),
            )
        },
        &[],
    )?;
    registry.insert(
        "Vars",
        |t: Size| {
            Rect::new(
                SIDE_WIDTH,
                4,
                t.width.saturating_sub(SIDE_WIDTH).max(1),
                t.height.saturating_sub(5).max(1),
            )
        },
        &[],
    )?;

    registry.set_focus_order(["Stack", "Ops", "Vars", "Result", "Input"]);
    Ok(())
}

fn seed_content(registry: &mut WindowRegistry) -> sash::Result<()> {
    registry
        .window_mut("Menu")?
        .push_content("q quit | tab next pane | shift-tab previous pane".into())?;

    registry.window_mut("Vars")?.push_content("x = 42".into())?;

    // The status line reads sibling geometry lazily through the shared
    // view, so it stays current across resizes without owning anything.
    let view = registry.geometry_view();
    let vars_report = CellValue::dynamic(move || match view.rect_of("Vars") {
        Some(rect) => format!(
            "Vars ([{}, {}], [{}, {}])",
            rect.y, rect.x, rect.height, rect.width
        ),
        None => "Vars unplaced".to_string(),
    });
    registry.window_mut("Status")?.push_content(vars_report)?;
    Ok(())
}
