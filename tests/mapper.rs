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
mod common;

use std::error::Error;

use common::*;
use sorm::prelude::*;
use sorm::Row;

fn fills() -> FillRegistry {
    FillRegistry::builder()
        .on_insert("created_at", || Some(stamp()))
        .on_update("updated_at", || Some(stamp()))
        .build()
}

#[test]
fn insert_runs_fills_and_writes_them_back() {
    let executor = RecordingExecutor::new();
    let sorm = Sorm::new(&executor).with_fills(fills());
    let mut user = User { uid: 7, nick_name: "jo".to_string(), ..Default::default() };
    assert_eq!(sorm.insert(&mut user).unwrap(), 1);
    assert_eq!(user.created_at, Some(stamp()));
    assert_eq!(user.updated_at, None);
    assert_eq!(
        executor.statements(),
        vec![(
            "INSERT INTO t_user (user_id, nickName, created_at) VALUES (?, ?, ?)".to_string(),
            vec![SqlValue::Bigint(7), SqlValue::Text("jo".to_string()), SqlValue::DateTime(stamp())],
        )]
    );
}

#[test]
fn insert_batch_fills_every_entity() {
    let executor = RecordingExecutor::new();
    let sorm = Sorm::new(&executor).with_fills(fills());
    let mut users = vec![
        User { uid: 1, nick_name: "jo".to_string(), ..Default::default() },
        User { uid: 2, nick_name: "al".to_string(), ..Default::default() },
    ];
    assert_eq!(sorm.insert_batch(&mut users).unwrap(), 1);
    assert!(users.iter().all(|u| u.created_at == Some(stamp())));
    assert_eq!(
        executor.statements(),
        vec![(
            "INSERT INTO t_user (user_id, nickName, created_at) VALUES (?, ?, ?), (?, ?, ?)".to_string(),
            vec![
                SqlValue::Bigint(1),
                SqlValue::Text("jo".to_string()),
                SqlValue::DateTime(stamp()),
                SqlValue::Bigint(2),
                SqlValue::Text("al".to_string()),
                SqlValue::DateTime(stamp()),
            ],
        )]
    );
}

#[test]
fn insert_batch_rejects_empty_and_ragged_batches() {
    let executor = RecordingExecutor::new();
    let sorm = Sorm::new(&executor);
    let mut none: Vec<User> = Vec::new();
    assert!(matches!(sorm.insert_batch(&mut none), Err(SormError::EmptyData)));
    let mut ragged = vec![
        User { uid: 1, nick_name: "jo".to_string(), ..Default::default() },
        User { uid: 2, ..Default::default() },
    ];
    assert!(matches!(sorm.insert_batch(&mut ragged), Err(SormError::InvalidField(_))));
    assert!(executor.statements().is_empty());
}

#[test]
fn delete_by_ids_targets_the_primary_key() {
    let executor = RecordingExecutor::new();
    let sorm = Sorm::new(&executor);
    sorm.delete_by_ids::<User, _>(&[3i64, 4, 5]).unwrap();
    sorm.delete_by_ids::<SysLoginLog, _>(&[9i64]).unwrap();
    assert_eq!(
        executor.statements(),
        vec![
            (
                "DELETE FROM t_user WHERE user_id in (?, ?, ?)".to_string(),
                vec![SqlValue::Bigint(3), SqlValue::Bigint(4), SqlValue::Bigint(5)],
            ),
            ("DELETE FROM sys_login_log WHERE id in (?)".to_string(), vec![SqlValue::Bigint(9)]),
        ]
    );
}

#[test]
fn delete_by_ids_needs_ids() {
    let executor = RecordingExecutor::new();
    let sorm = Sorm::new(&executor);
    let ids: [i64; 0] = [];
    assert!(matches!(sorm.delete_by_ids::<User, _>(&ids), Err(SormError::MissingCondition(_))));
    assert!(matches!(sorm.delete_by_ids::<Audit, _>(&[1i64]), Err(SormError::MissingIdent(_))));
    assert!(executor.statements().is_empty());
}

#[test]
fn update_by_id_uses_the_primary_key() {
    let executor = RecordingExecutor::new();
    let sorm = Sorm::new(&executor).with_fills(fills());
    let mut user = User { uid: 7, id: Some(3), nick_name: "jo".to_string(), ..Default::default() };
    sorm.update_by_id(&mut user).unwrap();
    assert_eq!(user.updated_at, Some(stamp()));
    let (sql, values) = executor.statements().remove(0);
    assert_eq!(sql, "UPDATE t_user SET id = ?, nickName = ?, updated_at = ? WHERE 1=1 AND user_id = ?");
    assert_eq!(values.last(), Some(&SqlValue::Bigint(7)));

    let mut keyless = User { nick_name: "jo".to_string(), ..Default::default() };
    assert!(matches!(sorm.update_by_id(&mut keyless), Err(SormError::MissingIdent(_))));
    assert_eq!(executor.statements().len(), 1);
}

#[test]
fn update_without_conditions_is_rejected_before_sql() {
    let executor = RecordingExecutor::new();
    let sorm = Sorm::new(&executor).with_fills(fills());
    let mut user = User { uid: 7, nick_name: "jo".to_string(), ..Default::default() };
    assert!(matches!(sorm.update(&mut user, &[]), Err(SormError::MissingCondition(_))));
    assert_eq!(user.updated_at, None);
    assert!(executor.statements().is_empty());

    sorm.update(&mut user, &["nickName"]).unwrap();
    let (sql, _) = executor.statements().remove(0);
    assert_eq!(sql, "UPDATE t_user SET user_id = ?, updated_at = ? WHERE 1=1 AND nickName = ?");
}

#[test]
fn delete_without_conditions_is_rejected() {
    let executor = RecordingExecutor::new();
    let sorm = Sorm::new(&executor);
    assert!(matches!(sorm.delete(&UserQuery::default()), Err(SormError::MissingCondition(_))));
    sorm.delete(&SysLoginLog { id: 4, ..Default::default() }).unwrap();
    assert_eq!(
        executor.statements(),
        vec![("DELETE FROM sys_login_log WHERE 1=1 AND id = ?".to_string(), vec![SqlValue::Bigint(4)])]
    );
}

#[test]
fn zero_count_skips_the_page_query() {
    let executor = RecordingExecutor::new().respond(count_row(0));
    let sorm = Sorm::new(&executor);
    let page: IPage<User> = sorm.select_page(&PageInfo::new(0, 10), "select * from t_user", &[]).unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(page.current, 1);
    assert!(page.records.is_empty());
    let statements = executor.statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].0, "SELECT count(*) FROM (select * from t_user) t");
}

#[test]
fn page_binds_query_values_before_limit() {
    let row = Row::new().with("user_id", 7i64).with("nickName", "jo").with("status", 1i32);
    let executor = RecordingExecutor::new().respond(count_row(12)).respond(vec![row]);
    let sorm = Sorm::new(&executor).with_config(SormConfig::default().set_max_page_size(5));
    let page_info = PageInfo::new(2, 50).add_order(OrderItem::desc("user_id"));
    let page: IPage<User> = sorm
        .select_page(&page_info, "select * from t_user where status = ?", &[SqlValue::Int(1)])
        .unwrap();
    assert_eq!((page.total, page.size, page.current), (12, 5, 2));
    assert_eq!(page.pages(), 3);
    assert_eq!(page.records, vec![User { uid: 7, nick_name: "jo".to_string(), status: Some(1), ..Default::default() }]);

    let (sql, values) = executor.statements().remove(1);
    assert_eq!(sql, "SELECT * FROM (select * from t_user where status = ?) t ORDER BY user_id desc LIMIT ? OFFSET ?");
    assert_eq!(values, vec![SqlValue::Int(1), SqlValue::Bigint(5), SqlValue::Bigint(5)]);
}

#[test]
fn counts_and_lists_by_query_struct() {
    let executor = RecordingExecutor::new()
        .respond(count_row(3))
        .respond(vec![Row::new().with("user_id", 9i64).with("nickName", "ann")]);
    let sorm = Sorm::new(&executor);
    let query = UserQuery { name: "an".to_string(), ..Default::default() };
    assert!(sorm.exists(&query).unwrap());
    let user: Option<User> = sorm.select_one(&query, &["user_id", "nickName"]).unwrap();
    assert_eq!(user.map(|u| u.uid), Some(9));
    let none: Vec<User> = sorm.select_list(&query, &[]).unwrap();
    assert!(none.is_empty());

    let statements = executor.statements();
    assert_eq!(statements[0].0, "SELECT count(*) FROM t_user WHERE 1=1 and name like CONCAT('%', ?, '%')");
    assert_eq!(statements[1].0, "SELECT user_id, nickName FROM t_user WHERE 1=1 and name like CONCAT('%', ?, '%')");
    assert_eq!(statements[2].0, "SELECT * FROM t_user WHERE 1=1 and name like CONCAT('%', ?, '%')");
}

#[test]
fn driver_errors_carry_the_statement() {
    let executor = RecordingExecutor::failing();
    let sorm = Sorm::new(&executor);
    let err = sorm.select_count("select * from t_user", &[]).unwrap_err();
    match &err {
        SormError::Execute { sql, .. } => assert_eq!(sql, "SELECT count(*) FROM (select * from t_user) t"),
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.source().is_some());
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn mapper_moves_onto_another_executor() {
    let pool = RecordingExecutor::new();
    let tx = RecordingExecutor::new();
    let sorm = Sorm::new(&pool).with_fills(fills());
    let mut user = User { uid: 1, ..Default::default() };
    sorm.with_executor(&tx).insert(&mut user).unwrap();
    assert!(pool.statements().is_empty());
    assert_eq!(tx.statements().len(), 1);
    assert_eq!(user.created_at, Some(stamp()));
}
