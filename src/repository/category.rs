use diesel::prelude::*;

use crate::domain::category::{Category, MilestoneTemplate};
use crate::models::category::{Category as DbCategory, MilestoneTemplate as DbTemplate};
use crate::repository::{CategoryReader, DieselRepository, RepositoryResult};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::milestone_categories;

        let mut conn = self.conn()?;

        let items = milestone_categories::table
            .order((
                milestone_categories::display_order.asc(),
                milestone_categories::id.asc(),
            ))
            .select(DbCategory::as_select())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn list_active_templates(&self) -> RepositoryResult<Vec<MilestoneTemplate>> {
        let mut conn = self.conn()?;

        let items = load_active_templates(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<MilestoneTemplate>, _>>()?;

        Ok(items)
    }
}

/// Active templates ordered by category, then declared display order.
pub(crate) fn load_active_templates(
    conn: &mut SqliteConnection,
) -> QueryResult<Vec<DbTemplate>> {
    use crate::schema::{milestone_categories, milestone_templates};

    milestone_templates::table
        .inner_join(milestone_categories::table)
        .filter(milestone_templates::is_active.eq(true))
        .order((
            milestone_categories::display_order.asc(),
            milestone_templates::display_order.asc(),
            milestone_templates::id.asc(),
        ))
        .select(DbTemplate::as_select())
        .load::<DbTemplate>(conn)
}
