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

//! Core types for sorm: bind values, operator keywords, the condition
//! dispatcher, the fluent builder and the per-type table metadata that the
//! derive macros generate.

#![deny(clippy::all)]

mod error;
mod value;
mod keyword;
mod fragment;
mod builder;
mod information;
mod fill;
mod data;

#[doc(inline)]
pub use error::*;
#[doc(inline)]
pub use value::*;
#[doc(inline)]
pub use keyword::*;
#[doc(inline)]
pub use fragment::*;
#[doc(inline)]
pub use builder::*;
#[doc(inline)]
pub use information::*;
#[doc(inline)]
pub use fill::*;
#[doc(inline)]
pub use data::*;
pub use serde;
