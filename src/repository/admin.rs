use diesel::prelude::*;

use crate::domain::admin::{Admin, NewAdmin};
use crate::domain::types::{AdminEmail, AdminId};
use crate::models::admin::{Admin as DbAdmin, NewAdmin as DbNewAdmin};
use crate::repository::{AdminReader, AdminWriter, DieselRepository, RepositoryResult};

impl AdminReader for DieselRepository {
    fn get_admin_by_email(&self, email: &AdminEmail) -> RepositoryResult<Option<Admin>> {
        use crate::schema::admins;

        let mut conn = self.conn()?;

        let admin = admins::table
            .filter(admins::email.eq(email.as_str()))
            .select(DbAdmin::as_select())
            .first::<DbAdmin>(&mut conn)
            .optional()?;

        Ok(admin.map(TryInto::try_into).transpose()?)
    }

    fn get_admin_by_id(&self, id: AdminId) -> RepositoryResult<Option<Admin>> {
        use crate::schema::admins;

        let mut conn = self.conn()?;

        let admin = admins::table
            .filter(admins::id.eq(id.get()))
            .select(DbAdmin::as_select())
            .first::<DbAdmin>(&mut conn)
            .optional()?;

        Ok(admin.map(TryInto::try_into).transpose()?)
    }
}

impl AdminWriter for DieselRepository {
    fn create_admin(&self, admin: &NewAdmin) -> RepositoryResult<Admin> {
        use crate::schema::admins;

        let mut conn = self.conn()?;
        let db_admin: DbNewAdmin = admin.into();

        let stored = diesel::insert_into(admins::table)
            .values(&db_admin)
            .returning(DbAdmin::as_returning())
            .get_result::<DbAdmin>(&mut conn)?;

        Ok(stored.try_into()?)
    }
}
