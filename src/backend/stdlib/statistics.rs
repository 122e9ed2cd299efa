//! `statistics`: averages and measures of spread.
//!
//! Every computed function reads its data as a slice. Averages and spread convert elements to `f64` (directly for
//! known floats, with `@floatFromInt` for known integers, through the runtime otherwise). Empty data returns
//! `error.StatisticsError`, as does `variance`/`stdev` with fewer than two points.

use super::{bind_sequence, body, c, elem_type, equals, f, sort_fn};
use crate::backend::codegen::{BlockLabel, CodegenResult, NativeCodegen};
use crate::backend::dispatch::{CallArgs, ModuleTable};
use crate::backend::infer::NativeType;
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Statistics,
    entries: &[
        ("mean", f(mean)),
        ("fmean", f(mean)),
        ("median", f(median)),
        ("median_low", f(median_low)),
        ("median_high", f(median_high)),
        ("mode", f(mode)),
        ("pvariance", f(pvariance)),
        ("variance", f(variance)),
        ("pstdev", f(pstdev)),
        ("stdev", f(stdev)),
        ("StatisticsError", c("error.StatisticsError")),
    ],
};

/// `value` as an `f64` expression, given the element type.
fn to_f64(elem: Option<&NativeType>, value: &str) -> String {
    match elem {
        Some(NativeType::Float) => value.to_string(),
        Some(NativeType::Int) => format!("@as(f64, @floatFromInt({}))", value),
        _ => format!("runtime.toF64({})", value),
    }
}

/// Open a block over the data argument. Returns `None` (after writing `0.0`) when there is no data argument.
fn open_data(
    cg: &mut NativeCodegen<'_>,
    args: &CallArgs<'_>,
    base: &str,
    min_len: usize,
) -> CodegenResult<Option<(BlockLabel, Option<NativeType>)>> {
    let Some(data) = args.arg(0, "data") else {
        cg.emit("0.0");
        return Ok(None);
    };
    let label = cg.emit_unique_block_start(base);
    let ty = bind_sequence(cg, &label, "data", data)?;
    cg.emit_block_line(
        &label,
        &format!("if ({{l}}_data.len < {}) return error.StatisticsError;", min_len),
    );
    Ok(Some((label, ty.element())))
}

/// Declare `{l}_mean` over `{l}_data`.
fn emit_mean(cg: &mut NativeCodegen<'_>, label: &BlockLabel, elem: Option<&NativeType>) {
    let value = to_f64(elem, "{l}_v");
    body(
        cg,
        label,
        &format!(
            "var {{l}}_sum: f64 = 0.0;
            for ({{l}}_data) |{{l}}_v| {{l}}_sum += {value};
            const {{l}}_mean = {{l}}_sum / @as(f64, @floatFromInt({{l}}_data.len));"
        ),
    );
}

/// Declare `{l}_sorted`, a sorted copy of `{l}_data`.
fn emit_sorted_copy(cg: &mut NativeCodegen<'_>, label: &BlockLabel, elem: Option<&NativeType>) {
    let data = label.local("data");
    let ty = elem_type(elem, &data);
    let sorter = sort_fn(elem, &data, false);
    body(
        cg,
        label,
        &format!(
            "const {{l}}_sorted = try allocator.dupe({ty}, {{l}}_data);
            std.mem.sort({ty}, {{l}}_sorted, {{}}, {sorter});"
        ),
    );
}

/// `mean(data)` / `fmean(data)`
fn mean(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some((label, elem)) = open_data(cg, args, "mean", 1)? else {
        return Ok(());
    };
    emit_mean(cg, &label, elem.as_ref());
    cg.emit_block_yield(&label, &label.local("mean"));
    Ok(())
}

/// `median(data)`: middle value, or the mean of the two middle values.
fn median(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some((label, elem)) = open_data(cg, args, "median", 1)? else {
        return Ok(());
    };
    emit_sorted_copy(cg, &label, elem.as_ref());
    let hi = to_f64(elem.as_ref(), "{l}_sorted[{l}_half]");
    let lo = to_f64(elem.as_ref(), "{l}_sorted[{l}_half - 1]");
    body(
        cg,
        &label,
        &format!(
            "const {{l}}_half = {{l}}_sorted.len / 2;
            if ({{l}}_sorted.len % 2 == 1) break :{{l}} {hi};"
        ),
    );
    cg.emit_block_yield(&label, &format!("({} + {}) / 2.0", lo, hi).replace("{l}", &label.name()));
    Ok(())
}

/// `median_low(data)`
fn median_low(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some((label, elem)) = open_data(cg, args, "median_low", 1)? else {
        return Ok(());
    };
    emit_sorted_copy(cg, &label, elem.as_ref());
    let sorted = label.local("sorted");
    cg.emit_block_yield(&label, &format!("{0}[({0}.len - 1) / 2]", sorted));
    Ok(())
}

/// `median_high(data)`
fn median_high(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some((label, elem)) = open_data(cg, args, "median_high", 1)? else {
        return Ok(());
    };
    emit_sorted_copy(cg, &label, elem.as_ref());
    let sorted = label.local("sorted");
    cg.emit_block_yield(&label, &format!("{0}[{0}.len / 2]", sorted));
    Ok(())
}

/// `mode(data)`: the most common value; ties go to the value seen first.
fn mode(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some((label, elem)) = open_data(cg, args, "mode", 1)? else {
        return Ok(());
    };
    let same = equals(elem.as_ref(), "{l}_y", "{l}_x");
    body(
        cg,
        &label,
        &format!(
            "var {{l}}_best: usize = 0;
            var {{l}}_best_count: usize = 0;
            for ({{l}}_data, 0..) |{{l}}_x, {{l}}_i| {{
                var {{l}}_count: usize = 0;
                for ({{l}}_data) |{{l}}_y| {{
                    if ({same}) {{l}}_count += 1;
                }}
                if ({{l}}_count > {{l}}_best_count) {{
                    {{l}}_best = {{l}}_i;
                    {{l}}_best_count = {{l}}_count;
                }}
            }}"
        ),
    );
    cg.emit_block_yield(&label, &format!("{}[{}]", label.local("data"), label.local("best")));
    Ok(())
}

/// Declare `{l}_var`: the sum of squared deviations divided by `len - ddof`.
fn emit_variance(cg: &mut NativeCodegen<'_>, label: &BlockLabel, elem: Option<&NativeType>, ddof: usize) {
    emit_mean(cg, label, elem);
    let value = to_f64(elem, "{l}_w");
    body(
        cg,
        label,
        &format!(
            "var {{l}}_ss: f64 = 0.0;
            for ({{l}}_data) |{{l}}_w| {{
                const {{l}}_dev = {value} - {{l}}_mean;
                {{l}}_ss += {{l}}_dev * {{l}}_dev;
            }}
            const {{l}}_var = {{l}}_ss / @as(f64, @floatFromInt({{l}}_data.len - {ddof}));"
        ),
    );
}

fn spread(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>, base: &str, ddof: usize, sqrt: bool) -> CodegenResult<()> {
    let Some((label, elem)) = open_data(cg, args, base, ddof + 1)? else {
        return Ok(());
    };
    emit_variance(cg, &label, elem.as_ref(), ddof);
    let var = label.local("var");
    if sqrt {
        cg.emit_block_yield(&label, &format!("@sqrt({})", var));
    } else {
        cg.emit_block_yield(&label, &var);
    }
    Ok(())
}

fn pvariance(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    spread(cg, args, "pvariance", 0, false)
}

fn variance(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    spread(cg, args, "variance", 1, false)
}

fn pstdev(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    spread(cg, args, "pstdev", 0, true)
}

fn stdev(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    spread(cg, args, "stdev", 1, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::infer::ShapeInferrer;
    use pyshim_syntax::ast::build::*;

    #[test]
    fn test_mean_of_integer_literal() {
        let inferrer = ShapeInferrer::new();
        let mut cg = NativeCodegen::new(&inferrer);
        mean(&mut cg, &CallArgs::from_slice(&[list(vec![int(1), int(2), int(6)])])).unwrap();
        let out = cg.finish();
        assert!(out.contains("const mean_0_data = &[_]i64{ 1, 2, 6 };"));
        assert!(out.contains("if (mean_0_data.len < 1) return error.StatisticsError;"));
        assert!(out.contains("for (mean_0_data) |mean_0_v| mean_0_sum += @as(f64, @floatFromInt(mean_0_v));"));
        assert!(out.ends_with("break :mean_0 mean_0_mean;\n}"));
    }

    #[test]
    fn test_median_breaks_early_for_odd_lengths() {
        let mut cg = NativeCodegen::without_inference();
        median(&mut cg, &CallArgs::from_slice(&[name("xs")])).unwrap();
        let out = cg.finish();
        assert!(out.contains("if (median_0_sorted.len % 2 == 1) break :median_0 runtime.toF64(median_0_sorted[median_0_half]);"));
        assert!(out.contains("break :median_0 (runtime.toF64(median_0_sorted[median_0_half - 1]) + runtime.toF64(median_0_sorted[median_0_half])) / 2.0;"));
    }

    #[test]
    fn test_sample_variance_needs_two_points() {
        let mut cg = NativeCodegen::without_inference();
        stdev(&mut cg, &CallArgs::from_slice(&[name("xs")])).unwrap();
        let out = cg.finish();
        assert!(out.contains("if (stdev_0_data.len < 2) return error.StatisticsError;"));
        assert!(out.contains("@floatFromInt(stdev_0_data.len - 1)"));
        assert!(out.ends_with("break :stdev_0 @sqrt(stdev_0_var);\n}"));
    }

    #[test]
    fn test_mode_on_strings_uses_mem_eql() {
        let inferrer = ShapeInferrer::new();
        let mut cg = NativeCodegen::new(&inferrer);
        mode(&mut cg, &CallArgs::from_slice(&[list(vec![str("a"), str("b"), str("a")])])).unwrap();
        assert!(cg.output().contains("if (std.mem.eql(u8, mode_0_y, mode_0_x)) mode_0_count += 1;"));
    }

    #[test]
    fn test_default_is_zero() {
        let mut cg = NativeCodegen::without_inference();
        variance(&mut cg, &CallArgs::from_slice(&[])).unwrap();
        assert_eq!(cg.finish(), "0.0");
    }
}
