use std::io;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sash::{AnsiRenderer, Rect, Shell, ShellEvent, Size, WindowRegistry};

fn build_shell() -> Shell {
    let mut registry = WindowRegistry::new(Size::new(100, 30));
    for (index, name) in ["Stack", "Input", "Result", "Ops", "Vars"]
        .into_iter()
        .enumerate()
    {
        let column = index as u16;
        registry
            .insert(
                name,
                move |t: Size| Rect::new(column * 20, 0, 20, t.height.max(1)),
                &[],
            )
            .expect("insert window");
    }
    registry.set_focus_order(["Stack", "Input", "Result", "Ops", "Vars"]);
    Shell::new(registry, AnsiRenderer::with_default())
}

fn key(code: KeyCode) -> ShellEvent {
    ShellEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn rotate_script() -> Vec<ShellEvent> {
    let mut script = Vec::new();
    for _ in 0..32 {
        script.push(key(KeyCode::Tab));
        script.push(key(KeyCode::BackTab));
    }
    script.push(key(KeyCode::Char('q')));
    script
}

fn resize_script() -> Vec<ShellEvent> {
    let mut script = Vec::new();
    for step in 0..16u16 {
        script.push(ShellEvent::Resize(Size::new(80 + step * 2, 24 + step)));
        script.push(key(KeyCode::Tab));
    }
    script.push(key(KeyCode::Char('q')));
    script
}

fn shell_rotate(c: &mut Criterion) {
    let script = rotate_script();
    c.bench_function("shell_rotate_script", |b| {
        b.iter(|| {
            let mut shell = build_shell();
            let mut sink = io::sink();
            shell
                .run_scripted(&mut sink, black_box(script.clone()))
                .expect("scripted run");
        });
    });
}

fn shell_resize(c: &mut Criterion) {
    let script = resize_script();
    c.bench_function("shell_resize_script", |b| {
        b.iter(|| {
            let mut shell = build_shell();
            let mut sink = io::sink();
            shell
                .run_scripted(&mut sink, black_box(script.clone()))
                .expect("scripted run");
        });
    });
}

criterion_group!(benches, shell_rotate, shell_resize);
criterion_main!(benches);
