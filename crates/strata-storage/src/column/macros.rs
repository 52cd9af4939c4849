macro_rules! with_nulls {
    ($col:expr, | $nulls:ident | $body:expr) => {
        match $col {
            Column::Bool { nulls: $nulls, .. }
            | Column::Int64 { nulls: $nulls, .. }
            | Column::Float64 { nulls: $nulls, .. }
            | Column::Numeric { nulls: $nulls, .. }
            | Column::String { nulls: $nulls, .. }
            | Column::Bytes { nulls: $nulls, .. }
            | Column::Date { nulls: $nulls, .. }
            | Column::Timestamp { nulls: $nulls, .. } => $body,
        }
    };
}

macro_rules! for_each_variant {
    ($col:expr, | $data:ident | $body:expr) => {
        match $col {
            Column::Bool { data: $data, .. } => $body,
            Column::Int64 { data: $data, .. } => $body,
            Column::Float64 { data: $data, .. } => $body,
            Column::Numeric { data: $data, .. } => $body,
            Column::String { data: $data, .. } => $body,
            Column::Bytes { data: $data, .. } => $body,
            Column::Date { data: $data, .. } => $body,
            Column::Timestamp { data: $data, .. } => $body,
        }
    };
}

macro_rules! gather_variant {
    ($variant:ident, $data:expr, $nulls:expr, $indices:expr) => {{
        let mut new_data = Vec::with_capacity($indices.len());
        let mut new_nulls = NullBitmap::with_capacity($indices.len());
        for &idx in $indices {
            new_data.push($data[idx].clone());
            new_nulls.push($nulls.is_null(idx));
        }
        Column::$variant {
            data: new_data,
            nulls: new_nulls,
        }
    }};
}
