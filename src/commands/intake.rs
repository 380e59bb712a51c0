use anyhow::Result;

use crate::pipeline::SalesIntakeForm;

use super::common::{open_deal, print_outcome};

pub fn submit(deal_id: String, form: SalesIntakeForm) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let company = form.company_name.clone();
    let outcome = machine.submit_sales_intake(form)?;
    print_outcome(&format!("Sales intake submitted for {company}"), outcome, &machine);
    Ok(())
}
