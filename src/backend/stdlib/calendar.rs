//! `calendar`: Gregorian date arithmetic.
//!
//! `isleap`, `leapdays`, `weekday` and `monthrange` are computed inline; weekdays use Sakamoto's method shifted so
//! Monday is 0. Name tables and weekday constants are literals. Printing and HTML calendars go to the runtime.

use super::{body, c, f, t};
use crate::backend::codegen::{BlockLabel, CodegenResult, NativeCodegen};
use crate::backend::dispatch::{CallArgs, ModuleTable};
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Calendar,
    entries: &[
        ("isleap", f(isleap)),
        ("leapdays", f(leapdays)),
        ("weekday", f(weekday)),
        ("monthrange", f(monthrange)),
        ("MONDAY", c("0")),
        ("TUESDAY", c("1")),
        ("WEDNESDAY", c("2")),
        ("THURSDAY", c("3")),
        ("FRIDAY", c("4")),
        ("SATURDAY", c("5")),
        ("SUNDAY", c("6")),
        (
            "month_name",
            c("&[_][]const u8{ \"\", \"January\", \"February\", \"March\", \"April\", \"May\", \"June\", \"July\", \"August\", \"September\", \"October\", \"November\", \"December\" }"),
        ),
        (
            "month_abbr",
            c("&[_][]const u8{ \"\", \"Jan\", \"Feb\", \"Mar\", \"Apr\", \"May\", \"Jun\", \"Jul\", \"Aug\", \"Sep\", \"Oct\", \"Nov\", \"Dec\" }"),
        ),
        (
            "day_name",
            c("&[_][]const u8{ \"Monday\", \"Tuesday\", \"Wednesday\", \"Thursday\", \"Friday\", \"Saturday\", \"Sunday\" }"),
        ),
        (
            "day_abbr",
            c("&[_][]const u8{ \"Mon\", \"Tue\", \"Wed\", \"Thu\", \"Fri\", \"Sat\", \"Sun\" }"),
        ),
        ("firstweekday", c("0")),
        ("setfirstweekday", c("{}")),
        ("timegm", t(1, "runtime.calendar.timegm($0)", "0")),
        ("month", t(2, "try runtime.calendar.month(allocator, $0, $1)", "\"\"")),
        ("calendar", t(1, "try runtime.calendar.calendar(allocator, $0)", "\"\"")),
        ("monthcalendar", t(2, "try runtime.calendar.monthcalendar(allocator, $0, $1)", "&.{}")),
        ("IllegalMonthError", c("error.IllegalMonthError")),
        ("IllegalWeekdayError", c("error.IllegalWeekdayError")),
    ],
};

/// Leap-year test over the block-local `{l}_<year>`.
fn leap_expr(year: &str) -> String {
    format!("(@mod({{l}}_{year}, 4) == 0 and @mod({{l}}_{year}, 100) != 0) or @mod({{l}}_{year}, 400) == 0")
}

/// Declare `{l}_dow` (Monday = 0) from the block-locals `{l}_y`, `{l}_m` and `day`.
fn emit_weekday(cg: &mut NativeCodegen<'_>, label: &BlockLabel, day: &str) {
    body(
        cg,
        label,
        &format!(
            "const {{l}}_t = [_]i64{{ 0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4 }};
            const {{l}}_yy = {{l}}_y - @as(i64, if ({{l}}_m < 3) 1 else 0);
            const {{l}}_sun = @mod({{l}}_yy + @divFloor({{l}}_yy, 4) - @divFloor({{l}}_yy, 100) + @divFloor({{l}}_yy, 400) + {{l}}_t[@intCast({{l}}_m - 1)] + {day}, 7);
            const {{l}}_dow = @mod({{l}}_sun + 6, 7);"
        ),
    );
}

/// `isleap(year)`
fn isleap(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(year) = args.get(0) else {
        cg.emit("false");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("isleap");
    cg.emit_block_bind_wrapped(&label, "y", "@as(i64, ", year, ")")?;
    cg.emit_block_break(&label);
    cg.emit(&leap_expr("y").replace("{l}", &label.name()));
    cg.emit_block_end(&label);
    Ok(())
}

/// `leapdays(y1, y2)`: leap years in `[y1, y2)`.
fn leapdays(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let (Some(y1), Some(y2)) = (args.get(0), args.get(1)) else {
        cg.emit("0");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("leapdays");
    cg.emit_block_bind_wrapped(&label, "a", "@as(i64, ", y1, ") - 1")?;
    cg.emit_block_bind_wrapped(&label, "b", "@as(i64, ", y2, ") - 1")?;
    body(
        cg,
        &label,
        "const {l}_na = @divFloor({l}_a, 4) - @divFloor({l}_a, 100) + @divFloor({l}_a, 400);
        const {l}_nb = @divFloor({l}_b, 4) - @divFloor({l}_b, 100) + @divFloor({l}_b, 400);",
    );
    cg.emit_block_yield(&label, &format!("{} - {}", label.local("nb"), label.local("na")));
    Ok(())
}

/// `weekday(year, month, day)`, Monday = 0.
fn weekday(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let (Some(year), Some(month), Some(day)) = (args.get(0), args.get(1), args.get(2)) else {
        cg.emit("0");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("weekday");
    cg.emit_block_bind_wrapped(&label, "y", "@as(i64, ", year, ")")?;
    cg.emit_block_bind_wrapped(&label, "m", "@as(i64, ", month, ")")?;
    cg.emit_block_bind_wrapped(&label, "d", "@as(i64, ", day, ")")?;
    emit_weekday(cg, &label, "{l}_d");
    cg.emit_block_yield(&label, &label.local("dow"));
    Ok(())
}

/// `monthrange(year, month)`: weekday of the first day and number of days.
fn monthrange(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let (Some(year), Some(month)) = (args.get(0), args.get(1)) else {
        cg.emit(".{ 0, 0 }");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("monthrange");
    cg.emit_block_bind_wrapped(&label, "y", "@as(i64, ", year, ")")?;
    cg.emit_block_bind_wrapped(&label, "m", "@as(i64, ", month, ")")?;
    body(
        cg,
        &label,
        &format!(
            "if ({{l}}_m < 1 or {{l}}_m > 12) return error.IllegalMonthError;
            const {{l}}_days = [_]i64{{ 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31 }};
            const {{l}}_leap = {};
            const {{l}}_ndays = {{l}}_days[@intCast({{l}}_m - 1)] + @as(i64, if ({{l}}_m == 2 and {{l}}_leap) 1 else 0);",
            leap_expr("y")
        ),
    );
    emit_weekday(cg, &label, "1");
    cg.emit_block_yield(&label, &format!(".{{ {}, {} }}", label.local("dow"), label.local("ndays")));
    Ok(())
}
