//! Fixture builders shared by unit tests.

/// Column-major payload of a MAT variable
pub enum MatData<'a> {
    Double(&'a [f64]),
    Single(&'a [f32]),
    Int16(&'a [i16]),
}

pub struct MatVar<'a> {
    pub name: &'a str,
    pub dims: (usize, usize),
    pub data: MatData<'a>,
}

const MI_INT8: u32 = 1;
const MI_INT16: u32 = 3;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_SINGLE: u32 = 7;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;

const MX_DOUBLE_CLASS: u32 = 6;
const MX_SINGLE_CLASS: u32 = 7;
const MX_INT16_CLASS: u32 = 10;

/// Encode an uncompressed little-endian Level 5 MAT-file.
pub fn mat_file(vars: &[MatVar]) -> Vec<u8> {
    let mut out = b"MATLAB 5.0 MAT-file, Platform: GLNXA64, Created on: Mon Jan  1 00:00:00 2024"
        .to_vec();
    out.resize(116, b' ');
    out.extend([0u8; 8]);
    out.extend(0x0100u16.to_le_bytes());
    out.extend(b"IM");
    for var in vars {
        out.extend(matrix_element(var));
    }
    out
}

fn element(data_type: u32, bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 16);
    out.extend(data_type.to_le_bytes());
    out.extend((bytes.len() as u32).to_le_bytes());
    out.extend(bytes);
    while out.len() % 8 != 0 {
        out.push(0);
    }
    out
}

fn matrix_element(var: &MatVar) -> Vec<u8> {
    let (class, data_type, bytes): (u32, u32, Vec<u8>) = match var.data {
        MatData::Double(v) => (
            MX_DOUBLE_CLASS,
            MI_DOUBLE,
            v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        ),
        MatData::Single(v) => (
            MX_SINGLE_CLASS,
            MI_SINGLE,
            v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        ),
        MatData::Int16(v) => (
            MX_INT16_CLASS,
            MI_INT16,
            v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        ),
    };

    let flags: Vec<u8> = [class, 0u32].iter().flat_map(|f| f.to_le_bytes()).collect();
    let dims: Vec<u8> = [var.dims.0 as i32, var.dims.1 as i32]
        .iter()
        .flat_map(|d| d.to_le_bytes())
        .collect();

    let mut body = element(MI_UINT32, &flags);
    body.extend(element(MI_INT32, &dims));
    body.extend(element(MI_INT8, var.name.as_bytes()));
    body.extend(element(data_type, &bytes));
    element(MI_MATRIX, &body)
}

/// Column-major f64 data for a `rows × cols` matrix whose (r, c) entry is
/// `r * 100_000 + c`, unique for any matrix up to 100000 columns.
pub fn indexed_column_major(rows: usize, cols: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * cols);
    for c in 0..cols {
        for r in 0..rows {
            data.push((r * 100_000 + c) as f64);
        }
    }
    data
}
