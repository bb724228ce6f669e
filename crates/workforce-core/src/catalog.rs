//! # Column Catalog
//!
//! The column set each HR screen hands to the table renderer. Catalogs go
//! through [`Columns::new`] like any other column set, so a clashing key
//! surfaces as [`CoreError::DuplicateColumnKey`](crate::error::CoreError).

use crate::column::{Cell, ColumnDescriptor, Columns};
use crate::entity::Entity;
use crate::error::CoreResult;
use crate::render::RenderContext;
use crate::types::{
    BiometricTerminal, Designation, EmployeeType, Grade, Holiday, LeaveType, Nationality,
    Organization, PermissionType, Region, WeeklyRoster,
};

/// `code` + localized `name`, the first two columns of most catalogs.
fn code_and_name<T, C>(code: C) -> Vec<ColumnDescriptor<T>>
where
    T: Entity,
    C: Fn(&T) -> &str + Send + Sync + 'static,
{
    vec![
        ColumnDescriptor::new("code", "Code", move |item: &T, _: &RenderContext| {
            Cell::text(code(item))
        })
        .width("15%"),
        ColumnDescriptor::new("name", "Name", |item: &T, ctx: &RenderContext| {
            Cell::text(item.display_name(ctx))
        }),
    ]
}

pub fn region_columns() -> CoreResult<Columns<Region>> {
    let mut columns = code_and_name(|r: &Region| r.code.as_str());
    columns.push(ColumnDescriptor::new(
        "description",
        "Description",
        |r: &Region, _: &RenderContext| Cell::opt_text(r.description.as_deref()),
    ));
    Columns::new(columns)
}

pub fn grade_columns() -> CoreResult<Columns<Grade>> {
    let mut columns = code_and_name(|g: &Grade| g.code.as_str());
    columns.push(
        ColumnDescriptor::new("overtime", "Overtime", |g: &Grade, _: &RenderContext| {
            Cell::Flag(g.overtime_eligible)
        })
        .width("10%"),
    );
    columns.push(
        ColumnDescriptor::new("senior", "Senior", |g: &Grade, _: &RenderContext| Cell::Flag(g.senior))
            .width("10%"),
    );
    Columns::new(columns)
}

pub fn organization_columns() -> CoreResult<Columns<Organization>> {
    let mut columns = code_and_name(|o: &Organization| o.code.as_str());
    columns.push(ColumnDescriptor::new(
        "type",
        "Type",
        |o: &Organization, _: &RenderContext| Cell::opt_text(o.organization_type.as_deref()),
    ));
    columns.push(ColumnDescriptor::new(
        "parent",
        "Parent",
        |o: &Organization, _: &RenderContext| o.parent_id.map_or(Cell::Empty, Cell::Number),
    ));
    Columns::new(columns)
}

pub fn designation_columns() -> CoreResult<Columns<Designation>> {
    let mut columns = code_and_name(|d: &Designation| d.code.as_str());
    columns.push(ColumnDescriptor::new(
        "remarks",
        "Remarks",
        |d: &Designation, _: &RenderContext| Cell::opt_text(d.remarks.as_deref()),
    ));
    Columns::new(columns)
}

pub fn nationality_columns() -> CoreResult<Columns<Nationality>> {
    Columns::new(code_and_name(|n: &Nationality| n.code.as_str()))
}

pub fn employee_type_columns() -> CoreResult<Columns<EmployeeType>> {
    let mut columns = code_and_name(|e: &EmployeeType| e.code.as_str());
    columns.push(
        ColumnDescriptor::new("active", "Active", |e: &EmployeeType, _: &RenderContext| {
            Cell::Flag(e.is_active)
        })
        .width("10%"),
    );
    Columns::new(columns)
}

pub fn holiday_columns() -> CoreResult<Columns<Holiday>> {
    Columns::new(vec![
        ColumnDescriptor::new("name", "Name", |h: &Holiday, ctx: &RenderContext| {
            Cell::text(h.display_name(ctx))
        }),
        ColumnDescriptor::new("from", "From", |h: &Holiday, _: &RenderContext| Cell::date(h.from_date))
            .width("15%"),
        ColumnDescriptor::new("to", "To", |h: &Holiday, _: &RenderContext| Cell::date(h.to_date))
            .width("15%"),
        ColumnDescriptor::new("days", "Days", |h: &Holiday, _: &RenderContext| Cell::Number(h.days()))
            .width("8%"),
        ColumnDescriptor::new("recurring", "Recurring", |h: &Holiday, _: &RenderContext| {
            Cell::Flag(h.recurring)
        })
        .width("10%"),
    ])
}

pub fn biometric_terminal_columns() -> CoreResult<Columns<BiometricTerminal>> {
    Columns::new(vec![
        ColumnDescriptor::new("device", "Device #", |t: &BiometricTerminal, _: &RenderContext| {
            Cell::opt_text(t.device_number.as_deref())
        })
        .width("12%"),
        ColumnDescriptor::new("name", "Name", |t: &BiometricTerminal, ctx: &RenderContext| {
            Cell::text(t.display_name(ctx))
        }),
        ColumnDescriptor::new("endpoint", "Address", |t: &BiometricTerminal, _: &RenderContext| {
            Cell::text(t.endpoint())
        }),
        ColumnDescriptor::new("serial", "Serial", |t: &BiometricTerminal, _: &RenderContext| {
            Cell::opt_text(t.serial_number.as_deref())
        }),
        ColumnDescriptor::new("status", "Status", |t: &BiometricTerminal, _: &RenderContext| {
            Cell::text(t.status.to_string())
        })
        .width("10%"),
    ])
}

pub fn leave_type_columns() -> CoreResult<Columns<LeaveType>> {
    let mut columns = code_and_name(|l: &LeaveType| l.code.as_str());
    columns.push(
        ColumnDescriptor::new("entitled", "Days / year", |l: &LeaveType, _: &RenderContext| {
            Cell::Number(l.entitled_days)
        })
        .width("12%"),
    );
    columns.push(
        ColumnDescriptor::new("paid", "Paid", |l: &LeaveType, _: &RenderContext| Cell::Flag(l.is_paid))
            .width("8%"),
    );
    Columns::new(columns)
}

pub fn permission_type_columns() -> CoreResult<Columns<PermissionType>> {
    let mut columns = code_and_name(|p: &PermissionType| p.code.as_str());
    columns.push(
        ColumnDescriptor::new("perDay", "Minutes / day", |p: &PermissionType, _: &RenderContext| {
            Cell::Number(p.max_minutes_per_day)
        })
        .width("12%"),
    );
    columns.push(
        ColumnDescriptor::new("perMonth", "Per month", |p: &PermissionType, _: &RenderContext| {
            Cell::Number(p.max_per_month)
        })
        .width("12%"),
    );
    Columns::new(columns)
}

pub fn weekly_roster_columns() -> CoreResult<Columns<WeeklyRoster>> {
    Columns::new(vec![
        ColumnDescriptor::new("name", "Name", |w: &WeeklyRoster, ctx: &RenderContext| {
            Cell::text(w.display_name(ctx))
        }),
        ColumnDescriptor::new("from", "From", |w: &WeeklyRoster, _: &RenderContext| Cell::date(w.from_date))
            .width("15%"),
        ColumnDescriptor::new("to", "To", |w: &WeeklyRoster, _: &RenderContext| {
            w.to_date.map_or(Cell::Empty, Cell::date)
        })
        .width("15%"),
        ColumnDescriptor::new("organization", "Organization", |w: &WeeklyRoster, _: &RenderContext| {
            w.organization_id.map_or(Cell::Empty, Cell::Number)
        }),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_every_catalog_is_populated() {
        let sizes = [
            region_columns().unwrap().len(),
            grade_columns().unwrap().len(),
            organization_columns().unwrap().len(),
            designation_columns().unwrap().len(),
            nationality_columns().unwrap().len(),
            employee_type_columns().unwrap().len(),
            holiday_columns().unwrap().len(),
            biometric_terminal_columns().unwrap().len(),
            leave_type_columns().unwrap().len(),
            permission_type_columns().unwrap().len(),
            weekly_roster_columns().unwrap().len(),
        ];
        assert_eq!(sizes, [3, 4, 4, 3, 2, 3, 5, 5, 4, 4, 4]);
    }

    #[test]
    fn test_region_row_follows_direction() {
        let columns = region_columns().unwrap();
        let region = Region::new(1, "N", "Northern", "الشمالية");

        let ltr = columns.render_row(&region, &RenderContext::ltr("en"));
        assert_eq!(ltr, vec![Cell::text("N"), Cell::text("Northern"), Cell::Empty]);

        let rtl = columns.render_row(&region, &RenderContext::rtl("ar"));
        assert_eq!(rtl[1], Cell::text("الشمالية"));
    }

    #[test]
    fn test_open_ended_roster() {
        let roster = WeeklyRoster {
            id: Some(4),
            name_en: "Ramadan shifts".to_string(),
            name_ar: String::new(),
            from_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            to_date: None,
            organization_id: None,
        };

        let cells = weekly_roster_columns().unwrap().render_row(&roster, &RenderContext::rtl("ar"));
        assert_eq!(
            cells,
            vec![
                Cell::text("Ramadan shifts"),
                Cell::Date("2025-03-01".to_string()),
                Cell::Empty,
                Cell::Empty,
            ]
        );
    }
}
