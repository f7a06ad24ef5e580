//! Shared fixtures: a tiny packaged box asset built in memory.
//!
//! Layout of the asset:
//! - `box` (root)
//!   - `lid`: animated by `open_animation` from (0, 0, 0) to (0, 1, 0) over 1 s
//!   - `jar`: mesh with bounds (-0.5, 0, -0.5)..(0.5, 1, 0.5)

#![allow(dead_code)]

use serde_json::json;

pub const ASSET_URI: &str = "cardboard_box.glb";
pub const BIN_URI: &str = "cardboard_box.bin";

const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

fn binary_payload() -> Vec<u8> {
    let times: [f32; 2] = [0.0, 1.0];
    let translations: [f32; 6] = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let positions: [f32; 9] = [-0.5, 0.0, -0.5, 0.5, 1.0, -0.5, 0.0, 0.0, 0.5];

    let mut bin = Vec::new();
    bin.extend_from_slice(bytemuck::cast_slice(&times));
    bin.extend_from_slice(bytemuck::cast_slice(&translations));
    bin.extend_from_slice(bytemuck::cast_slice(&positions));
    bin
}

fn document(bin_len: usize, bin_uri: Option<&str>) -> serde_json::Value {
    let mut buffer = json!({ "byteLength": bin_len });
    if let Some(uri) = bin_uri {
        buffer["uri"] = json!(uri);
    }

    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "name": "box", "children": [1, 2] },
            { "name": "lid" },
            { "name": "jar", "mesh": 0 }
        ],
        "meshes": [
            { "primitives": [ { "attributes": { "POSITION": 2 } } ] }
        ],
        "animations": [
            {
                "name": "open_animation",
                "channels": [ { "sampler": 0, "target": { "node": 1, "path": "translation" } } ],
                "samplers": [ { "input": 0, "output": 1, "interpolation": "LINEAR" } ]
            }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
            {
                "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [-0.5, 0.0, -0.5], "max": [0.5, 1.0, 0.5]
            }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 32, "byteLength": 36 }
        ],
        "buffers": [ buffer ]
    })
}

fn push_chunk(out: &mut Vec<u8>, kind: u32, mut data: Vec<u8>, pad: u8) {
    while data.len() % 4 != 0 {
        data.push(pad);
    }
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(&data);
}

fn glb(json: &serde_json::Value, bin: Option<Vec<u8>>) -> Vec<u8> {
    let mut chunks = Vec::new();
    push_chunk(&mut chunks, CHUNK_JSON, serde_json::to_vec(json).unwrap(), b' ');
    if let Some(bin) = bin {
        push_chunk(&mut chunks, CHUNK_BIN, bin, 0);
    }

    let mut out = Vec::with_capacity(12 + chunks.len());
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&((12 + chunks.len()) as u32).to_le_bytes());
    out.extend_from_slice(&chunks);
    out
}

/// Canonical binary glTF, as an authoring tool would export it.
pub fn canonical_box() -> Vec<u8> {
    let bin = binary_payload();
    glb(&document(bin.len(), None), Some(bin))
}

/// The box as distributed: header altered to `gltf`.
pub fn packaged_box() -> Vec<u8> {
    let (json, bin) = box_parts();
    package(&json, bin)
}

/// The box's JSON document and BIN payload, for tests that alter either.
pub fn box_parts() -> (serde_json::Value, Vec<u8>) {
    let bin = binary_payload();
    (document(bin.len(), None), bin)
}

/// Packs a document and BIN chunk into a GLB with the altered header.
pub fn package(json: &serde_json::Value, bin: Vec<u8>) -> Vec<u8> {
    let mut bytes = glb(json, Some(bin));
    bytes[2..4].copy_from_slice(b"tf");
    bytes
}

/// Packaged box whose geometry lives in an external `.bin` next to it.
/// Returns `(glb, bin)`.
pub fn packaged_box_external() -> (Vec<u8>, Vec<u8>) {
    let bin = binary_payload();
    let mut bytes = glb(&document(bin.len(), Some(BIN_URI)), None);
    bytes[2..4].copy_from_slice(b"tf");
    (bytes, bin)
}
