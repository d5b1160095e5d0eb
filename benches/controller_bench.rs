use criterion::{criterion_group, criterion_main, Criterion};

use rfscroll::{ContentModel, ControllerConfig, Host, NavigationEvent};

// Alternate fresh and back/forward navigations across a handful of pages.
fn bench_navigation_cycle(c: &mut Criterion) {
    let mut host = Host::new(ControllerConfig::default(), 720).expect("failed to create host");
    host.set_default_content(ContentModel::fixed(8000));
    let pages = ["/", "/services", "/portfolio", "/blog", "/contact"];

    c.bench_function("navigation_cycle", |b| {
        b.iter(|| {
            for (i, page) in pages.iter().enumerate() {
                host.navigate(NavigationEvent::fresh(*page));
                host.scroll_to(300 * (i as u32 + 1));
                host.run_task_turn();
            }
            for page in pages.iter().rev() {
                host.navigate(NavigationEvent::back_forward(*page));
                host.run_until_idle(20);
            }
        })
    });
}

// Restore onto a page that needs the full frame budget to grow tall enough.
fn bench_streaming_restore(c: &mut Criterion) {
    let mut host = Host::new(ControllerConfig::default(), 720).expect("failed to create host");
    host.set_content("/portfolio", ContentModel::streaming(720, 6000, 300));
    host.navigate(NavigationEvent::fresh("/portfolio"));
    host.run_frames(30);
    host.scroll_to(4000);

    c.bench_function("streaming_restore", |b| {
        b.iter(|| {
            host.navigate(NavigationEvent::fresh("/contact"));
            host.navigate(NavigationEvent::back_forward("/portfolio"));
            host.run_until_idle(20);
        })
    });
}

criterion_group!(benches, bench_navigation_cycle, bench_streaming_restore);
criterion_main!(benches);
