//! Importer integration tests.
//!
//! Fixture documents are generated on the fly (JSON text plus a hand-built
//! binary payload) and written to per-test temp directories, covering the
//! three buffer sources: external `.bin` files, GLB binary chunks, and
//! embedded base64 data URIs.

use std::path::{Path, PathBuf};

use crate::stream::{VertexFormat, VertexSemantic, VertexStreamLayout};


const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];
const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
];
const QUAD_NORMALS: [[f32; 3]; 4] = [[0.0, 0.0, 1.0]; 4];
const QUAD_TEXCOORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("meshstream_gltf_test_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Position + normal + texcoord0, interleaved into binding 0 (stride 32).
fn standard_layout() -> VertexStreamLayout {
    let mut layout = VertexStreamLayout::new();
    layout.set_vertex_type(VertexSemantic::Position, VertexFormat::Float3, 0);
    layout.set_vertex_type(VertexSemantic::Normal, VertexFormat::Float3, 0);
    layout.set_vertex_type(VertexSemantic::TexCoord(0), VertexFormat::Float2, 0);
    layout
}

/// Binary payload of the quad fixture: 6 u16 indices, then 4 positions,
/// 4 normals and 4 texcoords as packed little-endian floats (140 bytes).
fn quad_bin() -> Vec<u8> {
    let mut bin = Vec::new();
    for index in QUAD_INDICES {
        bin.extend_from_slice(&index.to_le_bytes());
    }
    for position in QUAD_POSITIONS {
        for value in position {
            bin.extend_from_slice(&value.to_le_bytes());
        }
    }
    for normal in QUAD_NORMALS {
        for value in normal {
            bin.extend_from_slice(&value.to_le_bytes());
        }
    }
    for texcoord in QUAD_TEXCOORDS {
        for value in texcoord {
            bin.extend_from_slice(&value.to_le_bytes());
        }
    }
    assert_eq!(bin.len(), 140);
    bin
}

/// Document JSON over the [`quad_bin`] payload.
///
/// `buffer_uri` of `None` means a GLB binary chunk. `attributes` is the
/// JSON body of each primitive's attribute map, and the same primitive is
/// repeated `primitives` times.
fn quad_json(buffer_uri: Option<&str>, attributes: &str, primitives: usize) -> String {
    let buffer = match buffer_uri {
        Some(uri) => format!(r#"{{"byteLength":140,"uri":"{uri}"}}"#),
        None => r#"{"byteLength":140}"#.to_string(),
    };
    let primitive = format!(r#"{{"attributes":{{{attributes}}},"indices":0}}"#);
    let primitives = vec![primitive; primitives].join(",");
    format!(
        concat!(
            r#"{{"asset":{{"version":"2.0"}},"#,
            r#""buffers":[{buffer}],"#,
            r#""bufferViews":["#,
            r#"{{"buffer":0,"byteOffset":0,"byteLength":12}},"#,
            r#"{{"buffer":0,"byteOffset":12,"byteLength":48}},"#,
            r#"{{"buffer":0,"byteOffset":60,"byteLength":48}},"#,
            r#"{{"buffer":0,"byteOffset":108,"byteLength":32}}],"#,
            r#""accessors":["#,
            r#"{{"bufferView":0,"componentType":5123,"count":6,"type":"SCALAR"}},"#,
            r#"{{"bufferView":1,"componentType":5126,"count":4,"type":"VEC3","#,
            r#""min":[0.0,0.0,0.0],"max":[1.0,1.0,0.0]}},"#,
            r#"{{"bufferView":2,"componentType":5126,"count":4,"type":"VEC3"}},"#,
            r#"{{"bufferView":3,"componentType":5126,"count":4,"type":"VEC2"}}],"#,
            r#""meshes":[{{"primitives":[{primitives}]}}]}}"#,
        ),
        buffer = buffer,
        primitives = primitives,
    )
}

/// Write `scene.gltf` plus an external binary next to it; returns the
/// document path.
fn write_scene(dir: &Path, json: &str, bin_name: &str, bin: &[u8]) -> PathBuf {
    let path = dir.join("scene.gltf");
    std::fs::write(&path, json).unwrap();
    std::fs::write(dir.join(bin_name), bin).unwrap();
    path
}

/// Write a GLB container: 12-byte header, padded JSON chunk, padded binary
/// chunk.
fn write_glb(path: &Path, json: &str, bin: &[u8]) {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(&0x4654_6C67u32.to_le_bytes()); // "glTF"
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F_534Au32.to_le_bytes()); // "JSON"
    glb.extend_from_slice(&json);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E_4942u32.to_le_bytes()); // "BIN\0"
    glb.extend_from_slice(&bin);
    std::fs::write(path, glb).unwrap();
}

/// Standard-alphabet base64 with `=` padding.
fn encode_base64(data: &[u8]) -> String {
    const ALPHABET: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::new();
    for chunk in data.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let triple = (b0 << 16) | (b1 << 8) | b2;
        out.push(ALPHABET[(triple >> 18) as usize & 63] as char);
        out.push(ALPHABET[(triple >> 12) as usize & 63] as char);
        out.push(if chunk.len() > 1 {
            ALPHABET[(triple >> 6) as usize & 63] as char
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            ALPHABET[triple as usize & 63] as char
        } else {
            '='
        });
    }
    out
}

/// Extract one attribute lane from an interleaved buffer.
fn extract_lane(bytes: &[u8], stride: usize, offset: usize, size: usize) -> Vec<u8> {
    bytes
        .chunks_exact(stride)
        .flat_map(|record| record[offset..offset + size].iter().copied())
        .collect()
}

/// Packed little-endian bytes of a float slice.
fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Document with `vertex_count` zeroed positions and three u32 indices,
/// used to exercise index width selection.
fn wide_fixture(dir: &Path, vertex_count: u32) -> PathBuf {
    let position_len = vertex_count as usize * 12;
    let json = format!(
        concat!(
            r#"{{"asset":{{"version":"2.0"}},"#,
            r#""buffers":[{{"byteLength":{total},"uri":"wide.bin"}}],"#,
            r#""bufferViews":["#,
            r#"{{"buffer":0,"byteOffset":0,"byteLength":12}},"#,
            r#"{{"buffer":0,"byteOffset":12,"byteLength":{position_len}}}],"#,
            r#""accessors":["#,
            r#"{{"bufferView":0,"componentType":5125,"count":3,"type":"SCALAR"}},"#,
            r#"{{"bufferView":1,"componentType":5126,"count":{count},"type":"VEC3","#,
            r#""min":[0.0,0.0,0.0],"max":[0.0,0.0,0.0]}}],"#,
            r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":1}},"indices":0}}]}}]}}"#,
        ),
        total = 12 + position_len,
        position_len = position_len,
        count = vertex_count,
    );

    let mut bin = vec![0u8; 12 + position_len];
    bin[0..4].copy_from_slice(&0u32.to_le_bytes());
    bin[4..8].copy_from_slice(&1u32.to_le_bytes());
    bin[8..12].copy_from_slice(&2u32.to_le_bytes());

    write_scene(dir, &json, "wide.bin", &bin)
}
