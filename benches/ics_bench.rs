//! Benchmarks for calendar export
//!
//! Run with: cargo bench

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use innotrue_hub::calendar::timezone::lookup;
use innotrue_hub::calendar::{escape_text, Attendee, CalendarEvent, IcsGenerator, Organizer};
use innotrue_hub::session::{resolve_active_role, OrgMembership, OrgRole, Role};

fn create_event(attendees: usize) -> CalendarEvent {
    let mut event = CalendarEvent::new(
        "bench-event",
        "Group Coaching; Cohort 4, Week 2",
        Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 3, 15, 11, 0, 0).unwrap(),
    )
    .description("Agenda:\n- goals\n- blockers, wins")
    .timezone("Europe/London")
    .organizer(Organizer::new("coach@example.com").name("Coach"))
    .recurring("bi-weekly");

    for i in 0..attendees {
        event = event.attendee(Attendee::new(format!("client{}@example.com", i)).name(format!("Client {}", i)));
    }
    event
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("ics");
    let generator = IcsGenerator::default();
    let now = Utc::now();

    for size in [0, 10, 100] {
        let event = create_event(size);

        group.throughput(Throughput::Elements(1));

        group.bench_function(format!("generate_{}_attendees", size), |b| {
            b.iter(|| generator.generate_at(black_box(&event), now).unwrap())
        });
    }

    group.bench_function("escape_text", |b| {
        b.iter(|| escape_text(black_box("Plan; review, \\ next\nsteps")))
    });

    group.finish();
}

fn bench_timezone(c: &mut Criterion) {
    let mut group = c.benchmark_group("timezone");
    let sydney = lookup("Australia/Sydney").unwrap();
    let instant = Utc.with_ymd_and_hms(2025, 10, 5, 16, 0, 0).unwrap();

    group.bench_function("offset_at", |b| {
        b.iter(|| sydney.offset_at(black_box(instant)))
    });

    group.bench_function("vtimezone_lines", |b| {
        b.iter(|| black_box(sydney).vtimezone_lines())
    });

    group.finish();
}

fn bench_role_resolution(c: &mut Criterion) {
    let membership = OrgMembership::new("org-1", OrgRole::Manager);
    let roles = [Role::Client, Role::Coach, Role::Instructor];

    c.bench_function("resolve_active_role", |b| {
        b.iter(|| resolve_active_role(black_box(&roles), Some(&membership), Some("coach")))
    });
}

criterion_group!(benches, bench_generate, bench_timezone, bench_role_resolution);
criterion_main!(benches);
