use criterion::{Criterion, black_box, criterion_group, criterion_main};

use redlilium_renderer::command::{
    ClearGraphics, DrawGraphics, DrawIndexedGraphics, SetDebugMarker, SetGraphicsViewports,
};
use redlilium_renderer::{
    ClearFlags, CommandBuffer, Context, DrawArguments, DrawIndexedArguments, NullRenderer,
    Renderer, Viewport,
};

fn record_frame(command_buffer: &mut CommandBuffer, draws: u32) {
    SetGraphicsViewports::create(command_buffer, &[Viewport::from_dimensions(1920, 1080)]);
    ClearGraphics::create(command_buffer, ClearFlags::COLOR_DEPTH, [0.0, 0.0, 0.0, 1.0], 1.0, 0);
    for index in 0..draws {
        DrawIndexedGraphics::create_inline(
            command_buffer,
            &[DrawIndexedArguments::new(36, 1).with_start_instance(index)],
        );
    }
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

fn bench_record_1000_draws(c: &mut Criterion) {
    c.bench_function("command_buffer_record_1000_draws", |b| {
        let mut command_buffer = CommandBuffer::with_capacity(64 * 1024);
        b.iter(|| {
            command_buffer.clear();
            record_frame(&mut command_buffer, 1000);
            black_box(command_buffer.number_of_commands());
        });
    });
}

fn bench_record_auxiliary_data(c: &mut Criterion) {
    c.bench_function("command_buffer_record_multi_draw_256", |b| {
        let arguments = vec![DrawArguments::new(3, 1); 256];
        let mut command_buffer = CommandBuffer::new();
        b.iter(|| {
            command_buffer.clear();
            for _ in 0..16 {
                DrawGraphics::create_inline(&mut command_buffer, &arguments);
                SetDebugMarker::create(&mut command_buffer, "batch");
            }
            black_box(command_buffer.capacity());
        });
    });
}

// ---------------------------------------------------------------------------
// Traversal and submission
// ---------------------------------------------------------------------------

fn bench_traverse_packets(c: &mut Criterion) {
    let mut command_buffer = CommandBuffer::new();
    record_frame(&mut command_buffer, 1000);
    c.bench_function("command_buffer_traverse_1002_packets", |b| {
        b.iter(|| black_box(command_buffer.packets().count()));
    });
}

fn bench_submit_to_null_renderer(c: &mut Criterion) {
    let mut command_buffer = CommandBuffer::new();
    record_frame(&mut command_buffer, 1000);
    let mut renderer = NullRenderer::new(Context::new());
    c.bench_function("null_renderer_submit_1000_draws", |b| {
        b.iter(|| {
            renderer.begin_scene();
            renderer.submit_command_buffer(&command_buffer);
            renderer.end_scene();
            renderer.clear_executed_commands();
            black_box(renderer.statistics().number_of_draw_calls());
        });
    });
}

criterion_group!(
    benches,
    bench_record_1000_draws,
    bench_record_auxiliary_data,
    bench_traverse_packets,
    bench_submit_to_null_renderer,
);
criterion_main!(benches);
