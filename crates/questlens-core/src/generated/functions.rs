//! QuestDB built-in functions.
//!
//! Generated from functions.toml

/// Broad function role, used for suggestion details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionCategory {
    Aggregate,
    Window,
    Scalar,
    Table,
}

impl FunctionCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FunctionCategory::Aggregate => "aggregate",
            FunctionCategory::Window => "window",
            FunctionCategory::Scalar => "scalar",
            FunctionCategory::Table => "table",
        }
    }
}

/// A function known to content assist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: &'static str,
    pub category: FunctionCategory,
    pub signature: &'static str,
    pub description: Option<&'static str>,
}

/// Built-in functions (96 total), in data file order.
pub static FUNCTIONS: &[FunctionInfo] = &[
    FunctionInfo {
        name: "abs",
        category: FunctionCategory::Scalar,
        signature: "abs(value)",
        description: Some("Absolute value"),
    },
    FunctionInfo {
        name: "approx_count_distinct",
        category: FunctionCategory::Aggregate,
        signature: "approx_count_distinct(value)",
        description: Some("HyperLogLog estimate of distinct values"),
    },
    FunctionInfo {
        name: "approx_percentile",
        category: FunctionCategory::Aggregate,
        signature: "approx_percentile(value, percentile)",
        description: Some("Approximate percentile using a histogram"),
    },
    FunctionInfo {
        name: "avg",
        category: FunctionCategory::Aggregate,
        signature: "avg(value)",
        description: Some("Arithmetic mean of the values in the group"),
    },
    FunctionInfo {
        name: "bool_and",
        category: FunctionCategory::Aggregate,
        signature: "bool_and(value)",
        description: Some("True when every value is true"),
    },
    FunctionInfo {
        name: "bool_or",
        category: FunctionCategory::Aggregate,
        signature: "bool_or(value)",
        description: Some("True when any value is true"),
    },
    FunctionInfo {
        name: "ceil",
        category: FunctionCategory::Scalar,
        signature: "ceil(value)",
        description: Some("Smallest integer not less than the value"),
    },
    FunctionInfo {
        name: "coalesce",
        category: FunctionCategory::Scalar,
        signature: "coalesce(value, ...)",
        description: Some("First non-null argument"),
    },
    FunctionInfo {
        name: "concat",
        category: FunctionCategory::Scalar,
        signature: "concat(value, ...)",
        description: Some("Concatenates values into a string"),
    },
    FunctionInfo {
        name: "corr",
        category: FunctionCategory::Aggregate,
        signature: "corr(x, y)",
        description: Some("Pearson correlation coefficient"),
    },
    FunctionInfo {
        name: "count",
        category: FunctionCategory::Aggregate,
        signature: "count(*) | count(value)",
        description: Some("Number of rows, or of non-null values"),
    },
    FunctionInfo {
        name: "count_distinct",
        category: FunctionCategory::Aggregate,
        signature: "count_distinct(value)",
        description: Some("Number of distinct non-null values"),
    },
    FunctionInfo {
        name: "covar_pop",
        category: FunctionCategory::Aggregate,
        signature: "covar_pop(x, y)",
        description: Some("Population covariance"),
    },
    FunctionInfo {
        name: "covar_samp",
        category: FunctionCategory::Aggregate,
        signature: "covar_samp(x, y)",
        description: Some("Sample covariance"),
    },
    FunctionInfo {
        name: "date_trunc",
        category: FunctionCategory::Scalar,
        signature: "date_trunc(unit, timestamp)",
        description: Some("Truncates a timestamp to a unit"),
    },
    FunctionInfo {
        name: "dateadd",
        category: FunctionCategory::Scalar,
        signature: "dateadd(period, amount, timestamp)",
        description: Some("Adds a period to a timestamp"),
    },
    FunctionInfo {
        name: "datediff",
        category: FunctionCategory::Scalar,
        signature: "datediff(period, ts1, ts2)",
        description: Some("Difference between two timestamps in a period"),
    },
    FunctionInfo {
        name: "day",
        category: FunctionCategory::Scalar,
        signature: "day(timestamp)",
        description: Some("Day of month of a timestamp"),
    },
    FunctionInfo {
        name: "day_of_week",
        category: FunctionCategory::Scalar,
        signature: "day_of_week(timestamp)",
        description: Some("Day of week, Monday = 1"),
    },
    FunctionInfo {
        name: "dense_rank",
        category: FunctionCategory::Window,
        signature: "dense_rank()",
        description: Some("Rank without gaps for ties"),
    },
    FunctionInfo {
        name: "exp",
        category: FunctionCategory::Scalar,
        signature: "exp(value)",
        description: Some("Exponential function"),
    },
    FunctionInfo {
        name: "extract",
        category: FunctionCategory::Scalar,
        signature: "extract(unit from timestamp)",
        description: Some("Extracts a part of a timestamp"),
    },
    FunctionInfo {
        name: "first",
        category: FunctionCategory::Aggregate,
        signature: "first(value)",
        description: Some("First value in the group by designated timestamp"),
    },
    FunctionInfo {
        name: "first_not_null",
        category: FunctionCategory::Aggregate,
        signature: "first_not_null(value)",
        description: Some("First non-null value in the group"),
    },
    FunctionInfo {
        name: "first_value",
        category: FunctionCategory::Window,
        signature: "first_value(value)",
        description: Some("First value in the window frame"),
    },
    FunctionInfo {
        name: "floor",
        category: FunctionCategory::Scalar,
        signature: "floor(value)",
        description: Some("Largest integer not greater than the value"),
    },
    FunctionInfo {
        name: "generate_series",
        category: FunctionCategory::Table,
        signature: "generate_series(start, end, step)",
        description: Some("Series of values"),
    },
    FunctionInfo {
        name: "haversine_dist_deg",
        category: FunctionCategory::Aggregate,
        signature: "haversine_dist_deg(lat, lon, ts)",
        description: Some("Travelled distance in kilometres"),
    },
    FunctionInfo {
        name: "hour",
        category: FunctionCategory::Scalar,
        signature: "hour(timestamp)",
        description: Some("Hour of a timestamp"),
    },
    FunctionInfo {
        name: "ksum",
        category: FunctionCategory::Aggregate,
        signature: "ksum(value)",
        description: Some("Kahan-compensated sum of doubles"),
    },
    FunctionInfo {
        name: "lag",
        category: FunctionCategory::Window,
        signature: "lag(value, offset, default)",
        description: Some("Value from a preceding row"),
    },
    FunctionInfo {
        name: "last",
        category: FunctionCategory::Aggregate,
        signature: "last(value)",
        description: Some("Last value in the group by designated timestamp"),
    },
    FunctionInfo {
        name: "last_not_null",
        category: FunctionCategory::Aggregate,
        signature: "last_not_null(value)",
        description: Some("Last non-null value in the group"),
    },
    FunctionInfo {
        name: "last_value",
        category: FunctionCategory::Window,
        signature: "last_value(value)",
        description: Some("Last value in the window frame"),
    },
    FunctionInfo {
        name: "lead",
        category: FunctionCategory::Window,
        signature: "lead(value, offset, default)",
        description: Some("Value from a following row"),
    },
    FunctionInfo {
        name: "left",
        category: FunctionCategory::Scalar,
        signature: "left(string, count)",
        description: Some("Leftmost characters of a string"),
    },
    FunctionInfo {
        name: "length",
        category: FunctionCategory::Scalar,
        signature: "length(value)",
        description: Some("Length of a string or binary value"),
    },
    FunctionInfo {
        name: "ln",
        category: FunctionCategory::Scalar,
        signature: "ln(value)",
        description: Some("Natural logarithm"),
    },
    FunctionInfo {
        name: "log",
        category: FunctionCategory::Scalar,
        signature: "log(value)",
        description: Some("Natural logarithm"),
    },
    FunctionInfo {
        name: "long_sequence",
        category: FunctionCategory::Table,
        signature: "long_sequence(count)",
        description: Some("Table of sequential longs"),
    },
    FunctionInfo {
        name: "lower",
        category: FunctionCategory::Scalar,
        signature: "lower(string)",
        description: Some("Lower-cases a string"),
    },
    FunctionInfo {
        name: "make_geohash",
        category: FunctionCategory::Scalar,
        signature: "make_geohash(lon, lat, bits)",
        description: Some("Geohash from coordinates"),
    },
    FunctionInfo {
        name: "max",
        category: FunctionCategory::Aggregate,
        signature: "max(value)",
        description: Some("Largest value in the group"),
    },
    FunctionInfo {
        name: "min",
        category: FunctionCategory::Aggregate,
        signature: "min(value)",
        description: Some("Smallest value in the group"),
    },
    FunctionInfo {
        name: "minute",
        category: FunctionCategory::Scalar,
        signature: "minute(timestamp)",
        description: Some("Minute of a timestamp"),
    },
    FunctionInfo {
        name: "month",
        category: FunctionCategory::Scalar,
        signature: "month(timestamp)",
        description: Some("Month of a timestamp"),
    },
    FunctionInfo {
        name: "now",
        category: FunctionCategory::Scalar,
        signature: "now()",
        description: Some("Current timestamp, fixed for the query"),
    },
    FunctionInfo {
        name: "nsum",
        category: FunctionCategory::Aggregate,
        signature: "nsum(value)",
        description: Some("Neumaier-compensated sum of doubles"),
    },
    FunctionInfo {
        name: "nullif",
        category: FunctionCategory::Scalar,
        signature: "nullif(a, b)",
        description: Some("Null when both arguments are equal"),
    },
    FunctionInfo {
        name: "power",
        category: FunctionCategory::Scalar,
        signature: "power(base, exponent)",
        description: Some("Raises base to exponent"),
    },
    FunctionInfo {
        name: "rank",
        category: FunctionCategory::Window,
        signature: "rank()",
        description: Some("Rank with gaps for ties"),
    },
    FunctionInfo {
        name: "regexp_replace",
        category: FunctionCategory::Scalar,
        signature: "regexp_replace(string, pattern, replacement)",
        description: Some("Regex replacement"),
    },
    FunctionInfo {
        name: "replace",
        category: FunctionCategory::Scalar,
        signature: "replace(string, from, to)",
        description: Some("Replaces occurrences in a string"),
    },
    FunctionInfo {
        name: "right",
        category: FunctionCategory::Scalar,
        signature: "right(string, count)",
        description: Some("Rightmost characters of a string"),
    },
    FunctionInfo {
        name: "rnd_double",
        category: FunctionCategory::Scalar,
        signature: "rnd_double(null_rate)",
        description: Some("Random double"),
    },
    FunctionInfo {
        name: "rnd_int",
        category: FunctionCategory::Scalar,
        signature: "rnd_int(min, max, null_rate)",
        description: Some("Random integer"),
    },
    FunctionInfo {
        name: "rnd_symbol",
        category: FunctionCategory::Scalar,
        signature: "rnd_symbol(value, ...)",
        description: Some("Random symbol from a list"),
    },
    FunctionInfo {
        name: "rnd_timestamp",
        category: FunctionCategory::Scalar,
        signature: "rnd_timestamp(low, high, null_rate)",
        description: Some("Random timestamp in a range"),
    },
    FunctionInfo {
        name: "rnd_uuid4",
        category: FunctionCategory::Scalar,
        signature: "rnd_uuid4()",
        description: Some("Random UUID v4"),
    },
    FunctionInfo {
        name: "round",
        category: FunctionCategory::Scalar,
        signature: "round(value, scale)",
        description: Some("Rounds to a number of decimal places"),
    },
    FunctionInfo {
        name: "row_number",
        category: FunctionCategory::Window,
        signature: "row_number()",
        description: Some("Sequential row number within the partition"),
    },
    FunctionInfo {
        name: "second",
        category: FunctionCategory::Scalar,
        signature: "second(timestamp)",
        description: Some("Second of a timestamp"),
    },
    FunctionInfo {
        name: "split_part",
        category: FunctionCategory::Scalar,
        signature: "split_part(string, delimiter, index)",
        description: Some("Field of a delimited string"),
    },
    FunctionInfo {
        name: "sqrt",
        category: FunctionCategory::Scalar,
        signature: "sqrt(value)",
        description: Some("Square root"),
    },
    FunctionInfo {
        name: "stddev",
        category: FunctionCategory::Aggregate,
        signature: "stddev(value)",
        description: Some("Sample standard deviation"),
    },
    FunctionInfo {
        name: "stddev_pop",
        category: FunctionCategory::Aggregate,
        signature: "stddev_pop(value)",
        description: Some("Population standard deviation"),
    },
    FunctionInfo {
        name: "stddev_samp",
        category: FunctionCategory::Aggregate,
        signature: "stddev_samp(value)",
        description: Some("Sample standard deviation"),
    },
    FunctionInfo {
        name: "string_agg",
        category: FunctionCategory::Aggregate,
        signature: "string_agg(value, delimiter)",
        description: Some("Concatenates values with a delimiter"),
    },
    FunctionInfo {
        name: "string_distinct_agg",
        category: FunctionCategory::Aggregate,
        signature: "string_distinct_agg(value, delimiter)",
        description: Some("Concatenates distinct values with a delimiter"),
    },
    FunctionInfo {
        name: "strpos",
        category: FunctionCategory::Scalar,
        signature: "strpos(string, substring)",
        description: Some("Position of a substring"),
    },
    FunctionInfo {
        name: "substring",
        category: FunctionCategory::Scalar,
        signature: "substring(string, start, length)",
        description: Some("Part of a string"),
    },
    FunctionInfo {
        name: "sum",
        category: FunctionCategory::Aggregate,
        signature: "sum(value)",
        description: Some("Sum of the values in the group"),
    },
    FunctionInfo {
        name: "sysdate",
        category: FunctionCategory::Scalar,
        signature: "sysdate()",
        description: Some("Current system date"),
    },
    FunctionInfo {
        name: "systimestamp",
        category: FunctionCategory::Scalar,
        signature: "systimestamp()",
        description: Some("Current system timestamp"),
    },
    FunctionInfo {
        name: "table_columns",
        category: FunctionCategory::Table,
        signature: "table_columns(table)",
        description: Some("Column metadata of a table"),
    },
    FunctionInfo {
        name: "table_partitions",
        category: FunctionCategory::Table,
        signature: "table_partitions(table)",
        description: Some("Partition metadata of a table"),
    },
    FunctionInfo {
        name: "tables",
        category: FunctionCategory::Table,
        signature: "tables()",
        description: Some("Table metadata"),
    },
    FunctionInfo {
        name: "timestamp_ceil",
        category: FunctionCategory::Scalar,
        signature: "timestamp_ceil(unit, timestamp)",
        description: Some("Ceils a timestamp to a unit"),
    },
    FunctionInfo {
        name: "timestamp_floor",
        category: FunctionCategory::Scalar,
        signature: "timestamp_floor(unit, timestamp)",
        description: Some("Floors a timestamp to a unit"),
    },
    FunctionInfo {
        name: "timestamp_sequence",
        category: FunctionCategory::Scalar,
        signature: "timestamp_sequence(start, step)",
        description: Some("Increasing timestamp sequence"),
    },
    FunctionInfo {
        name: "to_date",
        category: FunctionCategory::Scalar,
        signature: "to_date(string, format)",
        description: Some("Parses a string into a date"),
    },
    FunctionInfo {
        name: "to_str",
        category: FunctionCategory::Scalar,
        signature: "to_str(timestamp, format)",
        description: Some("Formats a timestamp as a string"),
    },
    FunctionInfo {
        name: "to_timestamp",
        category: FunctionCategory::Scalar,
        signature: "to_timestamp(string, format)",
        description: Some("Parses a string into a timestamp"),
    },
    FunctionInfo {
        name: "to_timezone",
        category: FunctionCategory::Scalar,
        signature: "to_timezone(timestamp, zone)",
        description: Some("Converts a UTC timestamp to a time zone"),
    },
    FunctionInfo {
        name: "to_utc",
        category: FunctionCategory::Scalar,
        signature: "to_utc(timestamp, zone)",
        description: Some("Converts a local timestamp to UTC"),
    },
    FunctionInfo {
        name: "today",
        category: FunctionCategory::Scalar,
        signature: "today()",
        description: Some("Interval covering the current day"),
    },
    FunctionInfo {
        name: "tomorrow",
        category: FunctionCategory::Scalar,
        signature: "tomorrow()",
        description: Some("Interval covering the next day"),
    },
    FunctionInfo {
        name: "trim",
        category: FunctionCategory::Scalar,
        signature: "trim(string)",
        description: Some("Removes surrounding whitespace"),
    },
    FunctionInfo {
        name: "upper",
        category: FunctionCategory::Scalar,
        signature: "upper(string)",
        description: Some("Upper-cases a string"),
    },
    FunctionInfo {
        name: "var_pop",
        category: FunctionCategory::Aggregate,
        signature: "var_pop(value)",
        description: Some("Population variance"),
    },
    FunctionInfo {
        name: "var_samp",
        category: FunctionCategory::Aggregate,
        signature: "var_samp(value)",
        description: Some("Sample variance"),
    },
    FunctionInfo {
        name: "variance",
        category: FunctionCategory::Aggregate,
        signature: "variance(value)",
        description: Some("Sample variance"),
    },
    FunctionInfo {
        name: "vwap",
        category: FunctionCategory::Aggregate,
        signature: "vwap(price, quantity)",
        description: Some("Volume-weighted average price"),
    },
    FunctionInfo {
        name: "wal_tables",
        category: FunctionCategory::Table,
        signature: "wal_tables()",
        description: Some("WAL status of tables"),
    },
    FunctionInfo {
        name: "year",
        category: FunctionCategory::Scalar,
        signature: "year(timestamp)",
        description: Some("Year of a timestamp"),
    },
    FunctionInfo {
        name: "yesterday",
        category: FunctionCategory::Scalar,
        signature: "yesterday()",
        description: Some("Interval covering the previous day"),
    },
];
