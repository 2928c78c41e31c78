use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use leave_tracker::store::{LeaveStore, MemoryStorage};
use leave_tracker::{Days, Employee, LeaveDuration, LeaveType, Month, calculate};

/// Generates employees with a repeating leave pattern.
///
/// Pattern per month (repeating over the leave types):
/// 1. Full day on the 1st
/// 2. Half day on the 2nd
/// 3. Full day on the 3rd
///
/// up to `days_per_month` entries, so every cell of the grid gets used.
pub struct EmployeeGenerator {
    next: u32,
    count: u32,
    days_per_month: u32,
}

impl EmployeeGenerator {
    pub fn new(count: u32, days_per_month: u32) -> Self {
        Self {
            next: 0,
            count,
            days_per_month: days_per_month.min(28),
        }
    }

    fn employee(&self, index: u32) -> Employee {
        let mut employee = Employee::new(format!("employee-{index}")).with_allowances(
            Days::whole(3),
            Days::whole(12),
            Days::ZERO,
        );
        for month in Month::all() {
            for day in 1..=self.days_per_month {
                let leave_type = LeaveType::ALL[(day as usize) % LeaveType::COUNT];
                let duration = if day % 3 == 2 {
                    LeaveDuration::Half
                } else {
                    LeaveDuration::Full
                };
                let Some(date) = NaiveDate::from_ymd_opt(2026, month.number(), day) else {
                    continue;
                };
                employee
                    .leave_by_month
                    .bucket_mut(month, leave_type)
                    .toggle(date, duration);
            }
        }
        employee
    }
}

impl Iterator for EmployeeGenerator {
    type Item = Employee;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let employee = self.employee(self.next);
        self.next += 1;
        Some(employee)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EmployeeGenerator {}

fn bench_calculate(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate");

    for days in [0u32, 5, 20] {
        let employee = EmployeeGenerator::new(1, days).next().unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(days), &employee, |b, employee| {
            b.iter(|| black_box(calculate(black_box(employee))));
        });
    }

    group.finish();
}

fn bench_calculate_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_all");

    for count in [10u32, 100, 1_000] {
        let employees: Vec<Employee> = EmployeeGenerator::new(count, 10).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &employees, |b, employees| {
            b.iter(|| {
                let calculated: Vec<_> = employees.iter().map(calculate).collect();
                black_box(calculated)
            });
        });
    }

    group.finish();
}

fn bench_store_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_add");
    group.sample_size(10);

    // every add rewrites the whole collection
    for count in [10u32, 100] {
        let employees: Vec<Employee> = EmployeeGenerator::new(count, 10).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &employees, |b, employees| {
            b.iter(|| {
                let mut store = LeaveStore::load(MemoryStorage::new());
                for employee in employees {
                    store.add(employee.clone());
                }
                store
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_calculate, bench_calculate_all, bench_store_writes);
criterion_main!(benches);
