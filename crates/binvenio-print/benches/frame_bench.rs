// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the byte-at-a-time frame readers and ~HI
// classification in the binvenio-print crate.

use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use binvenio_print::frame::{ByteStream, FrameReader};
use binvenio_print::handshake::classify;

const HI_REPLY: &[u8] = b"\x02ZD410-203dpi,V84.20.18Z,8,8192KB\x03\r\n";

/// A Link-OS style JSON reply with nested objects and quoted braces.
fn json_reply(entries: usize) -> Vec<u8> {
    let mut body = String::from("{");
    for i in 0..entries {
        if i > 0 {
            body.push(',');
        }
        body.push_str(&format!(
            r#""key.{i}":{{"value":"text with {{braces}} and \"quotes\"","n":{i}}}"#
        ));
    }
    body.push('}');
    body.into_bytes()
}

fn read(rt: &Runtime, frame: FrameReader, input: &[u8]) -> usize {
    rt.block_on(async {
        let mut src = ByteStream::new(input, Duration::from_secs(1));
        frame.read(&mut src).await.map(|v| v.len()).unwrap_or(0)
    })
}

fn bench_marked(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    c.bench_function("read_marked (~HI reply)", |b| {
        b.iter(|| read(&rt, FrameReader::Marked, black_box(HI_REPLY)))
    });
}

fn bench_balanced_object(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let small = json_reply(1);
    let large = json_reply(200);

    c.bench_function("read_balanced_object (single key)", |b| {
        b.iter(|| read(&rt, FrameReader::BalancedObject, black_box(&small)))
    });
    c.bench_function("read_balanced_object (200 keys)", |b| {
        b.iter(|| read(&rt, FrameReader::BalancedObject, black_box(&large)))
    });
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify (~HI payload)", |b| {
        b.iter(|| classify(black_box(&HI_REPLY[1..33]), 8))
    });
}

criterion_group!(benches, bench_marked, bench_balanced_object, bench_classify);
criterion_main!(benches);
