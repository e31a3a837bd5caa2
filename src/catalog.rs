//! Static PromQL vocabulary: functions, aggregation operators, keywords and
//! range literals.

use crate::types::Suggestion;

/// One entry of the function catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: &'static str,
    pub signature: &'static str,
    pub documentation: &'static str,
}

impl FunctionDef {
    pub fn to_suggestion(&self) -> Suggestion {
        Suggestion::new(self.name)
            .insert_text(self.name)
            .detail(self.signature)
            .documentation(self.documentation)
    }
}

const fn f(
    name: &'static str,
    signature: &'static str,
    documentation: &'static str,
) -> FunctionDef {
    FunctionDef {
        name,
        signature,
        documentation,
    }
}

/// Aggregation operators, usable with `by`/`without`.
pub const AGGREGATION_OPERATORS: &[FunctionDef] = &[
    f("sum", "sum(v instant-vector)", "Calculate sum over dimensions"),
    f("min", "min(v instant-vector)", "Select minimum over dimensions"),
    f("max", "max(v instant-vector)", "Select maximum over dimensions"),
    f("avg", "avg(v instant-vector)", "Calculate the average over dimensions"),
    f("group", "group(v instant-vector)", "All values in the resulting vector are 1"),
    f("stddev", "stddev(v instant-vector)", "Calculate population standard deviation over dimensions"),
    f("stdvar", "stdvar(v instant-vector)", "Calculate population standard variance over dimensions"),
    f("count", "count(v instant-vector)", "Count number of elements in the vector"),
    f("count_values", "count_values(label string, v instant-vector)", "Count number of elements with the same value"),
    f("bottomk", "bottomk(k scalar, v instant-vector)", "Smallest k elements by sample value"),
    f("topk", "topk(k scalar, v instant-vector)", "Largest k elements by sample value"),
    f("quantile", "quantile(φ scalar, v instant-vector)", "Calculate φ-quantile (0 ≤ φ ≤ 1) over dimensions"),
    f("limitk", "limitk(k scalar, v instant-vector)", "Sample k elements"),
    f("limit_ratio", "limit_ratio(ratio scalar, v instant-vector)", "Sample elements with approximately the given ratio"),
];

/// Functions.
pub const FUNCTIONS: &[FunctionDef] = &[
    f("abs", "abs(v instant-vector)", "Returns the input vector with all sample values converted to their absolute value."),
    f("absent", "absent(v instant-vector)", "Returns an empty vector if the vector passed to it has any elements and a 1-element vector with the value 1 if the vector passed to it has no elements. This is useful for alerting on when no time series exist for a given metric name and label combination."),
    f("absent_over_time", "absent_over_time(v range-vector)", "Returns an empty vector if the range vector passed to it has any elements and a 1-element vector with the value 1 if the range vector passed to it has no elements."),
    f("ceil", "ceil(v instant-vector)", "Rounds the sample values of all elements in `v` up to the nearest integer."),
    f("changes", "changes(v range-vector)", "For each input time series, `changes(v range-vector)` returns the number of times its value has changed within the provided time range as an instant vector."),
    f("clamp", "clamp(v instant-vector, min scalar, max scalar)", "Clamps the sample values of all elements in `v` to have a lower limit of `min` and an upper limit of `max`."),
    f("clamp_max", "clamp_max(v instant-vector, max scalar)", "Clamps the sample values of all elements in `v` to have an upper limit of `max`."),
    f("clamp_min", "clamp_min(v instant-vector, min scalar)", "Clamps the sample values of all elements in `v` to have a lower limit of `min`."),
    f("day_of_month", "day_of_month(v=vector(time()) instant-vector)", "Returns the day of the month for each of the given times in UTC. Returned values are from 1 to 31."),
    f("day_of_week", "day_of_week(v=vector(time()) instant-vector)", "Returns the day of the week for each of the given times in UTC. Returned values are from 0 to 6, where 0 means Sunday etc."),
    f("day_of_year", "day_of_year(v=vector(time()) instant-vector)", "Returns the day of the year for each of the given times in UTC. Returned values are from 1 to 365 for non-leap years, and 1 to 366 in leap years."),
    f("days_in_month", "days_in_month(v=vector(time()) instant-vector)", "Returns number of days in the month for each of the given times in UTC. Returned values are from 28 to 31."),
    f("delta", "delta(v range-vector)", "Calculates the difference between the first and last value of each time series element in a range vector `v`, returning an instant vector with the given deltas and equivalent labels. The delta is extrapolated to cover the full time range as specified in the range vector selector, so that it is possible to get a non-integer result even if the sample values are all integers."),
    f("deriv", "deriv(v range-vector)", "Calculates the per-second derivative of the time series in a range vector `v`, using simple linear regression."),
    f("exp", "exp(v instant-vector)", "Calculates the exponential function for all elements in `v`.\nSpecial cases are:\n* `Exp(+Inf) = +Inf` \n* `Exp(NaN) = NaN`"),
    f("floor", "floor(v instant-vector)", "Rounds the sample values of all elements in `v` down to the nearest integer."),
    f("histogram_quantile", "histogram_quantile(φ scalar, b instant-vector)", "Calculates the φ-quantile (0 ≤ φ ≤ 1) from the buckets `b` of a histogram. The samples in `b` are the counts of observations in each bucket. Each sample must have a label `le` where the label value denotes the inclusive upper bound of the bucket. (Samples without such a label are silently ignored.) The histogram metric type automatically provides time series with the `_bucket` suffix and the appropriate labels."),
    f("histogram_count", "histogram_count(v instant-vector)", "Returns the count of observations stored in a native histogram."),
    f("histogram_sum", "histogram_sum(v instant-vector)", "Returns the sum of observations stored in a native histogram."),
    f("histogram_fraction", "histogram_fraction(lower scalar, upper scalar, v instant-vector)", "Returns the estimated fraction of observations between the provided lower and upper values for a native histogram."),
    f("holt_winters", "holt_winters(v range-vector, sf scalar, tf scalar)", "Produces a smoothed value for time series based on the range in `v`. The lower the smoothing factor `sf`, the more importance is given to old data. The higher the trend factor `tf`, the more trends in the data is considered. Both `sf` and `tf` must be between 0 and 1."),
    f("hour", "hour(v=vector(time()) instant-vector)", "Returns the hour of the day for each of the given times in UTC. Returned values are from 0 to 23."),
    f("idelta", "idelta(v range-vector)", "Calculates the difference between the last two samples in the range vector `v`, returning an instant vector with the given deltas and equivalent labels."),
    f("increase", "increase(v range-vector)", "Calculates the increase in the time series in the range vector. Breaks in monotonicity (such as counter resets due to target restarts) are automatically adjusted for. The increase is extrapolated to cover the full time range as specified in the range vector selector, so that it is possible to get a non-integer result even if a counter increases only by integer increments."),
    f("irate", "irate(v range-vector)", "Calculates the per-second instant rate of increase of the time series in the range vector. This is based on the last two data points. Breaks in monotonicity (such as counter resets due to target restarts) are automatically adjusted for."),
    f("label_join", "label_join(v instant-vector, dst_label string, separator string, src_label_1 string, src_label_2 string, ...)", "For each timeseries in `v`, joins all the values of all the `src_labels` using `separator` and returns the timeseries with the label `dst_label` containing the joined value. There can be any number of `src_labels` in this function."),
    f("label_replace", "label_replace(v instant-vector, dst_label string, replacement string, src_label string, regex string)", "For each timeseries in `v`, `label_replace(v instant-vector, dst_label string, replacement string, src_label string, regex string)`  matches the regular expression `regex` against the label `src_label`.  If it matches, then the timeseries is returned with the label `dst_label` replaced by the expansion of `replacement`. `$1` is replaced with the first matching subgroup, `$2` with the second etc. If the regular expression doesn't match then the timeseries is returned unchanged."),
    f("last_over_time", "last_over_time(v range-vector)", "The most recent point value in specified interval."),
    f("ln", "ln(v instant-vector)", "Calculates the natural logarithm for all elements in `v`.\nSpecial cases are:\n * `ln(+Inf) = +Inf`\n * `ln(0) = -Inf`\n * `ln(x < 0) = NaN`\n * `ln(NaN) = NaN`"),
    f("log10", "log10(v instant-vector)", "Calculates the decimal logarithm for all elements in `v`. The special cases are equivalent to those in `ln`."),
    f("log2", "log2(v instant-vector)", "Calculates the binary logarithm for all elements in `v`. The special cases are equivalent to those in `ln`."),
    f("minute", "minute(v=vector(time()) instant-vector)", "Returns the minute of the hour for each of the given times in UTC. Returned values are from 0 to 59."),
    f("month", "month(v=vector(time()) instant-vector)", "Returns the month of the year for each of the given times in UTC. Returned values are from 1 to 12, where 1 means January etc."),
    f("predict_linear", "predict_linear(v range-vector, t scalar)", "Predicts the value of time series `t` seconds from now, based on the range vector `v`, using simple linear regression."),
    f("rate", "rate(v range-vector)", "Calculates the per-second average rate of increase of the time series in the range vector. Breaks in monotonicity (such as counter resets due to target restarts) are automatically adjusted for. Also, the calculation extrapolates to the ends of the time range, allowing for missed scrapes or imperfect alignment of scrape cycles with the range's time period."),
    f("resets", "resets(v range-vector)", "For each input time series, `resets(v range-vector)` returns the number of counter resets within the provided time range as an instant vector. Any decrease in the value between two consecutive samples is interpreted as a counter reset."),
    f("round", "round(v instant-vector, to_nearest=1 scalar)", "Rounds the sample values of all elements in `v` to the nearest integer. Ties are resolved by rounding up. The optional `to_nearest` argument allows specifying the nearest multiple to which the sample values should be rounded. This multiple may also be a fraction."),
    f("scalar", "scalar(v instant-vector)", "Given a single-element input vector, `scalar(v instant-vector)` returns the sample value of that single element as a scalar. If the input vector does not have exactly one element, `scalar` will return `NaN`."),
    f("sgn", "sgn(v instant-vector)", "Returns a vector with all sample values converted to their sign, defined as this: 1 if v is positive, -1 if v is negative and 0 if v is equal to zero."),
    f("sort", "sort(v instant-vector)", "Returns vector elements sorted by their sample values, in ascending order."),
    f("sort_desc", "sort_desc(v instant-vector)", "Returns vector elements sorted by their sample values, in descending order."),
    f("sqrt", "sqrt(v instant-vector)", "Calculates the square root of all elements in `v`."),
    f("time", "time()", "Returns the number of seconds since January 1, 1970 UTC. Note that this does not actually return the current time, but the time at which the expression is to be evaluated."),
    f("timestamp", "timestamp(v instant-vector)", "Returns the timestamp of each of the samples of the given vector as the number of seconds since January 1, 1970 UTC."),
    f("vector", "vector(s scalar)", "Returns the scalar `s` as a vector with no labels."),
    f("year", "year(v=vector(time()) instant-vector)", "Returns the year for each of the given times in UTC."),
    f("avg_over_time", "avg_over_time(range-vector)", "The average value of all points in the specified interval."),
    f("min_over_time", "min_over_time(range-vector)", "The minimum value of all points in the specified interval."),
    f("max_over_time", "max_over_time(range-vector)", "The maximum value of all points in the specified interval."),
    f("sum_over_time", "sum_over_time(range-vector)", "The sum of all values in the specified interval."),
    f("count_over_time", "count_over_time(range-vector)", "The count of all values in the specified interval."),
    f("quantile_over_time", "quantile_over_time(scalar, range-vector)", "The φ-quantile (0 ≤ φ ≤ 1) of the values in the specified interval."),
    f("stddev_over_time", "stddev_over_time(range-vector)", "The population standard deviation of the values in the specified interval."),
    f("stdvar_over_time", "stdvar_over_time(range-vector)", "The population standard variance of the values in the specified interval."),
    f("present_over_time", "present_over_time(range-vector)", "The value 1 for any series in the specified interval."),
];

/// Language keywords.
pub const KEYWORDS: &[&str] = &[
    "by",
    "without",
    "on",
    "ignoring",
    "group_left",
    "group_right",
    "offset",
    "bool",
    "and",
    "or",
    "unless",
];

/// Range literals offered inside `[...]`, in display order: the interval
/// variables first, then durations ascending. The second field is the
/// canonical sort value.
pub const RANGE_LITERALS: &[(&str, &str)] = &[
    ("$__interval", "$__interval"),
    ("$__rate_interval", "$__rate_interval"),
    ("1m", "00:01:00"),
    ("5m", "00:05:00"),
    ("10m", "00:10:00"),
    ("30m", "00:30:00"),
    ("1h", "01:00:00"),
    ("1d", "24:00:00"),
];

/// Aggregation operators followed by functions.
pub fn all_functions() -> impl Iterator<Item = &'static FunctionDef> {
    AGGREGATION_OPERATORS.iter().chain(FUNCTIONS.iter())
}

pub fn is_function(name: &str) -> bool {
    all_functions().any(|def| def.name == name)
}

/// Aggregation operator names are case-insensitive.
pub fn is_aggregation(name: &str) -> bool {
    AGGREGATION_OPERATORS
        .iter()
        .any(|def| def.name.eq_ignore_ascii_case(name))
}

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Range literal suggestions in display order.
pub fn range_suggestions() -> Vec<Suggestion> {
    RANGE_LITERALS
        .iter()
        .map(|(label, sort)| Suggestion::new(*label).sort_value(*sort))
        .collect()
}
