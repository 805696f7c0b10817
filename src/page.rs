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

use serde::{Deserialize, Serialize};

/// One `ORDER BY` item of a page request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderItem {
    pub column: String,
    #[serde(default = "default_asc")]
    pub asc: bool,
}

fn default_asc() -> bool {
    true
}

impl OrderItem {
    pub fn asc<S: Into<String>>(column: S) -> Self {
        OrderItem { column: column.into(), asc: true }
    }

    pub fn desc<S: Into<String>>(column: S) -> Self {
        OrderItem { column: column.into(), asc: false }
    }
}

/// A page request: 1-based page number, page size and ordering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PageInfo {
    #[serde(default)]
    pub current: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub orders: Vec<OrderItem>,
}

impl PageInfo {
    pub fn new(current: u64, size: u64) -> Self {
        PageInfo { current, size, orders: Vec::new() }
    }

    pub fn set_page(mut self, current: u64, size: u64) -> Self {
        self.current = current;
        self.size = size;
        self
    }

    pub fn add_order(mut self, order: OrderItem) -> Self {
        self.orders.push(order);
        self
    }

    /// Page numbers start at 1; 0 is read as the first page.
    pub fn current(&self) -> u64 {
        self.current.max(1)
    }

    /// Rows to skip; `None` when the request is out of range.
    pub fn offset(&self) -> Option<u64> {
        (self.current() - 1).checked_mul(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IPage<T>
where T: Sized {
    pub total: u64,
    pub size: u64,
    pub current: u64,
    pub records: Vec<T>,
}

impl<T> IPage<T>
where T: Sized {
    pub fn new(current: u64, size: u64, total: u64, records: Vec<T>) -> Self {
        Self {
            total,
            size,
            current,
            records,
        }
    }

    pub fn empty(current: u64, size: u64) -> Self {
        Self::new(current, size, 0, Vec::new())
    }

    pub fn offset(&self) -> u64 {
        self.current.saturating_sub(1).saturating_mul(self.size)
    }

    pub fn pages(&self) -> u64 {
        if self.size == 0 { 0 } else { self.total.div_ceil(self.size) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_zero_is_first_page() {
        let page = PageInfo::new(0, 20);
        assert_eq!(page.current(), 1);
        assert_eq!(page.offset(), Some(0));
        assert_eq!(PageInfo::new(3, 20).offset(), Some(40));
    }

    #[test]
    fn huge_page_numbers_have_no_offset() {
        let page: PageInfo = serde_json::from_str(r#"{"current": 18446744073709551615, "size": 10}"#).unwrap();
        assert_eq!(page.offset(), None);
        let page: IPage<u8> = IPage::new(u64::MAX, u64::MAX, 0, vec![]);
        assert_eq!(page.offset(), u64::MAX);
    }

    #[test]
    fn reads_page_request_json() {
        let page: PageInfo = serde_json::from_str(r#"{"current": 2, "size": 10, "orders": [{"column": "id", "asc": false}, {"column": "name"}]}"#).unwrap();
        assert_eq!(page, PageInfo::new(2, 10).add_order(OrderItem::desc("id")).add_order(OrderItem::asc("name")));
    }

    #[test]
    fn counts_pages() {
        let page: IPage<u8> = IPage::new(1, 10, 21, vec![]);
        assert_eq!(page.pages(), 3);
        assert_eq!(IPage::<u8>::empty(1, 0).pages(), 0);
    }
}
