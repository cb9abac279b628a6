//! Small ONNX models written on the fly for classifier tests.
//!
//! Each model reshapes the digit input to a row vector and multiplies it with
//! a weight matrix, so the scores are known exactly for a given image.

use std::path::{Path, PathBuf};

/// ONNX `TensorProto.DataType` codes.
const FLOAT: u64 = 1;
const INT64: u64 = 7;

/// One axis of a declared tensor shape.
#[derive(Debug, Clone, Copy)]
pub enum Dim {
    Fixed(i64),
    Symbolic(&'static str),
}

/// A `Reshape -> MatMul` model.
#[derive(Debug, Clone)]
pub struct LinearModel {
    pub input_name: &'static str,
    pub output_name: &'static str,
    pub input_dims: Vec<Dim>,
    pub output_dims: Vec<Dim>,
    /// Target of the reshape; the second entry is the weight matrix height.
    pub reshape: [i64; 2],
    /// Weight matrix width, the number of scores produced.
    pub classes: usize,
}

impl LinearModel {
    /// The MNIST model zoo signature: `Input3` [1,1,28,28] to `Plus214_Output_0` [1,10].
    pub fn mnist() -> Self {
        Self {
            input_name: "Input3",
            output_name: "Plus214_Output_0",
            input_dims: vec![Dim::Fixed(1), Dim::Fixed(1), Dim::Fixed(28), Dim::Fixed(28)],
            output_dims: vec![Dim::Fixed(1), Dim::Fixed(10)],
            reshape: [1, 784],
            classes: 10,
        }
    }

    /// Encode the model with weights `w[row][col] = weight(row, col)`.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn encode(&self, weight: impl Fn(usize, usize) -> f32) -> Vec<u8> {
        let rows = self.reshape[1] as usize;

        let shape_raw: Vec<u8> = self.reshape.iter().flat_map(|d| d.to_le_bytes()).collect();
        let weights_raw: Vec<u8> = (0..rows)
            .flat_map(|r| (0..self.classes).map(move |c| (r, c)))
            .flat_map(|(r, c)| weight(r, c).to_le_bytes())
            .collect();

        let mut graph = Vec::new();
        bytes_field(
            &mut graph,
            1,
            &node(&[self.input_name, "shape"], &["flat"], "Reshape"),
        );
        bytes_field(
            &mut graph,
            1,
            &node(&["flat", "weights"], &[self.output_name], "MatMul"),
        );
        bytes_field(&mut graph, 2, b"linear");
        bytes_field(&mut graph, 5, &tensor("shape", &[2], INT64, &shape_raw));
        bytes_field(
            &mut graph,
            5,
            &tensor("weights", &[rows as i64, self.classes as i64], FLOAT, &weights_raw),
        );
        bytes_field(&mut graph, 11, &value_info(self.input_name, &self.input_dims));
        bytes_field(&mut graph, 12, &value_info(self.output_name, &self.output_dims));

        let mut opset = Vec::new();
        bytes_field(&mut opset, 1, b"");
        varint_field(&mut opset, 2, 13);

        let mut model = Vec::new();
        varint_field(&mut model, 1, 7);
        bytes_field(&mut model, 2, b"mnist-ort-tests");
        bytes_field(&mut model, 7, &graph);
        bytes_field(&mut model, 8, &opset);
        model
    }

    /// Encode the model into `dir/name` and return the path.
    pub fn write(&self, dir: &Path, name: &str, weight: impl Fn(usize, usize) -> f32) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.encode(weight)).unwrap();
        path
    }
}

/// Weights that route pixel `i` to class `i % 10` with weight 1.
pub fn modulo_weights(row: usize, col: usize) -> f32 {
    if row % 10 == col {
        1.0
    } else {
        0.0
    }
}

fn node(inputs: &[&str], outputs: &[&str], op_type: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    for input in inputs {
        bytes_field(&mut buf, 1, input.as_bytes());
    }
    for output in outputs {
        bytes_field(&mut buf, 2, output.as_bytes());
    }
    bytes_field(&mut buf, 4, op_type.as_bytes());
    buf
}

#[allow(clippy::cast_sign_loss)]
fn tensor(name: &str, dims: &[i64], data_type: u64, raw: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    for &dim in dims {
        varint_field(&mut buf, 1, dim as u64);
    }
    varint_field(&mut buf, 2, data_type);
    bytes_field(&mut buf, 8, name.as_bytes());
    bytes_field(&mut buf, 9, raw);
    buf
}

#[allow(clippy::cast_sign_loss)]
fn value_info(name: &str, dims: &[Dim]) -> Vec<u8> {
    let mut shape = Vec::new();
    for dim in dims {
        let mut entry = Vec::new();
        match dim {
            Dim::Fixed(value) => varint_field(&mut entry, 1, *value as u64),
            Dim::Symbolic(param) => bytes_field(&mut entry, 2, param.as_bytes()),
        }
        bytes_field(&mut shape, 1, &entry);
    }

    let mut tensor_type = Vec::new();
    varint_field(&mut tensor_type, 1, FLOAT);
    bytes_field(&mut tensor_type, 2, &shape);

    let mut type_proto = Vec::new();
    bytes_field(&mut type_proto, 1, &tensor_type);

    let mut buf = Vec::new();
    bytes_field(&mut buf, 1, name.as_bytes());
    bytes_field(&mut buf, 2, &type_proto);
    buf
}

#[allow(clippy::cast_possible_truncation)]
fn varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

fn varint_field(buf: &mut Vec<u8>, field: u64, value: u64) {
    varint(buf, field << 3);
    varint(buf, value);
}

fn bytes_field(buf: &mut Vec<u8>, field: u64, bytes: &[u8]) {
    varint(buf, (field << 3) | 2);
    varint(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_encoding() {
        let mut buf = Vec::new();
        varint(&mut buf, 300);
        assert_eq!(buf, [0xac, 0x02]);
    }
}
