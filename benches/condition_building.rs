/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::time::Duration;
use sorm::prelude::*;

#[derive(Criteria, Default)]
#[table(name = "t_user")]
struct UserQuery {
    id: i64,
    #[field(keyword = "like")]
    name: String,
    #[field(keyword = "between")]
    age: Between,
    #[field(keyword = "in")]
    status: Vec<u8>,
    #[field(keyword = "ge,created_at")]
    created_from: Option<chrono::NaiveDateTime>,
}

pub fn bench_condition_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition_building");
    group.measurement_time(Duration::from_secs(3));

    // Benchmark: Simple builder
    group.bench_function("simple_builder", |b| {
        b.iter(|| {
            let mut builder = SelectBuilder::new("select * from t_user");
            builder.eq("username", "test").eq("status", 1);
            black_box(builder.build());
        });
    });

    // Benchmark: Grouped builder
    group.bench_function("grouped_builder", |b| {
        b.iter(|| {
            let mut builder = SelectBuilder::new("select * from t_user");
            builder.eq("username", "test").ne("status", 0).between("age", 18, 65);
            let mut or_group = builder.multiple();
            or_group.like("name", "john").or().in_list("level", vec![1, 2, 3]);
            builder.ors(or_group);
            black_box(builder.build());
        });
    });

    // Benchmark: Query struct to statement
    group.bench_function("query_struct", |b| {
        let query = UserQuery {
            id: 1,
            name: "jo".to_string(),
            age: Between::new(10, 20),
            status: vec![1, 2, 3],
            ..Default::default()
        };
        b.iter(|| {
            black_box(SelectBuilder::from_query(black_box(&query), None).build());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_condition_building);
criterion_main!(benches);
