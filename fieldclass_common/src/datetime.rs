/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc, ParseResult};
use std::time::Duration;

/// the date format we use for all user facing date specs
pub const DATE_FMT: &'static str = "%Y-%m-%d";

#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }

pub fn parse_date (s: &str)->ParseResult<NaiveDate> {
    NaiveDate::parse_from_str( s.trim(), DATE_FMT)
}

pub fn fmt_date (d: &NaiveDate)->String {
    d.format(DATE_FMT).to_string()
}

/// the UTC midnight of the given date
pub fn utc_midnight (d: &NaiveDate)->DateTime<Utc> {
    d.and_time( NaiveTime::MIN).and_utc()
}

/// seconds since the Unix epoch of the UTC midnight of the given date
pub fn to_epoch_secs (d: &NaiveDate)->i64 {
    utc_midnight(d).timestamp()
}

/// fixed step date grid `start + k*step` for all k with `start + k*step < end`. This is empty if
/// `end <= start` or `step_days == 0`
pub fn date_grid (start: &NaiveDate, end: &NaiveDate, step_days: u32)->Vec<NaiveDate> {
    let mut grid = Vec::new();
    if step_days > 0 {
        let step = TimeDelta::days( step_days as i64);
        let mut d = *start;
        while d < *end {
            grid.push(d);
            d = d + step;
        }
    }
    grid
}

/// number of whole days between two dates (negative if `d1` is before `d0`)
pub fn days_between (d0: &NaiveDate, d1: &NaiveDate)->i64 {
    (*d1 - *d0).num_days()
}
