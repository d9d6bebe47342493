//! Layouts recorded from C compilers for targets other than the host.
//!
//! Rows are `(fixture, sizeof, alignof, offsets in declaration order)`.

type Table = &'static [(&'static str, u64, u64, &'static [u64])];

/// GCC, System V x86-64.
const X86_64_LINUX: Table = &[
    ("test1", 16, 8, &[0, 4, 8]),
    ("test2", 24, 8, &[0, 8, 16]),
    ("test3", 16, 8, &[0, 8, 12]),
    ("test4", 24, 8, &[0, 8, 16]),
    ("test5", 24, 8, &[0, 8, 16]),
    ("test6", 8, 4, &[0, 2, 4]),
    ("test7", 8, 4, &[0, 4, 6]),
    ("test8", 8, 4, &[0, 4, 6, 7]),
    ("test9", 12, 4, &[0, 4, 6, 7, 8]),
    ("test10", 24, 8, &[0, 16]),
    ("test11", 24, 8, &[0, 8, 10, 16]),
    ("test12", 16, 8, &[0, 8]),
    ("test13", 3, 1, &[0, 1]),
    ("test14", 8, 2, &[0, 1, 4, 6]),
    ("test15", 32, 8, &[0, 16]),
    ("test16", 112, 8, &[0, 80, 84]),
    ("test17", 3, 1, &[0]),
    ("test18", 300, 1, &[0]),
    (
        "test19",
        728,
        8,
        &[
            0, 1, 2, 3, 36, 80, 84, 117, 160, 168, 176, 184, 440, 448, 704, 708, 712, 716, 720,
        ],
    ),
];

/// GCC, System V i386: `double` is 4-aligned inside structs.
const I686_LINUX: Table = &[
    ("test1", 16, 4, &[0, 4, 8]),
    ("test2", 16, 4, &[0, 4, 12]),
    ("test3", 16, 4, &[0, 8, 12]),
    ("test4", 20, 4, &[0, 8, 16]),
    ("test5", 20, 4, &[0, 4, 12]),
    ("test6", 8, 4, &[0, 2, 4]),
    ("test7", 8, 4, &[0, 4, 6]),
    ("test8", 8, 4, &[0, 4, 6, 7]),
    ("test9", 12, 4, &[0, 4, 6, 7, 8]),
    ("test10", 20, 4, &[0, 16]),
    ("test11", 12, 4, &[0, 4, 6, 8]),
    ("test12", 8, 4, &[0, 4]),
    ("test13", 3, 1, &[0, 1]),
    ("test14", 8, 2, &[0, 1, 4, 6]),
    ("test15", 32, 4, &[0, 16]),
    ("test16", 108, 4, &[0, 80, 84]),
    ("test17", 3, 1, &[0]),
    ("test18", 300, 1, &[0]),
    (
        "test19",
        708,
        4,
        &[
            0, 1, 2, 3, 36, 80, 84, 117, 160, 164, 168, 172, 428, 432, 688, 692, 696, 700, 704,
        ],
    ),
];

/// GCC, 32-bit ARM EABI: 4-byte pointers but 8-aligned `double`.
const ARMV7_LINUX: Table = &[
    ("test1", 16, 8, &[0, 4, 8]),
    ("test2", 24, 8, &[0, 8, 16]),
    ("test3", 16, 8, &[0, 8, 12]),
    ("test4", 24, 8, &[0, 8, 16]),
    ("test5", 24, 8, &[0, 8, 16]),
    ("test6", 8, 4, &[0, 2, 4]),
    ("test7", 8, 4, &[0, 4, 6]),
    ("test8", 8, 4, &[0, 4, 6, 7]),
    ("test9", 12, 4, &[0, 4, 6, 7, 8]),
    ("test10", 24, 8, &[0, 16]),
    ("test11", 12, 4, &[0, 4, 6, 8]),
    ("test12", 8, 4, &[0, 4]),
    ("test13", 3, 1, &[0, 1]),
    ("test14", 8, 2, &[0, 1, 4, 6]),
    ("test15", 32, 8, &[0, 16]),
    ("test16", 112, 8, &[0, 80, 84]),
    ("test17", 3, 1, &[0]),
    ("test18", 300, 1, &[0]),
    (
        "test19",
        708,
        4,
        &[
            0, 1, 2, 3, 36, 80, 84, 117, 160, 164, 168, 172, 428, 432, 688, 692, 696, 700, 704,
        ],
    ),
];

const TABLES: &[(&str, Table)] = &[
    ("x86_64-unknown-linux-gnu", X86_64_LINUX),
    ("i686-unknown-linux-gnu", I686_LINUX),
    ("armv7-unknown-linux-gnueabihf", ARMV7_LINUX),
];

/// Targets with recorded reference layouts.
pub fn recorded_triples() -> impl Iterator<Item = &'static str> {
    TABLES.iter().map(|&(triple, _)| triple)
}

pub(crate) fn table(triple: &str) -> Option<Table> {
    TABLES
        .iter()
        .find(|&&(name, _)| name == triple)
        .map(|&(_, table)| table)
}
